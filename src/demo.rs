//! Scripted playback of a three-task agent session, used to preview the
//! transcript without a live backend.

use std::thread;
use std::time::Duration;

use crate::event::Event;
use crate::queue::EventQueue;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Emit(Event),
    Pause(u64),
}

fn emit(event: Event) -> Step {
    Step::Emit(event)
}

fn pause(ms: u64) -> Step {
    Step::Pause(ms)
}

fn reply(text: &str) -> Step {
    emit(Event::reply(text))
}

fn analysis(text: &str) -> Step {
    emit(Event::AnalysisReady {
        message: text.to_string(),
    })
}

fn tokens(context_used: u64, tokens_used: u64) -> Step {
    emit(Event::TokenUsageUpdate {
        context_used,
        tokens_used,
    })
}

fn command(text: &str) -> Step {
    emit(Event::CommandStarted {
        message: text.to_string(),
    })
}

fn output(text: &str) -> Step {
    emit(Event::output_line(text))
}

fn read(path: &str, summary: &str) -> Step {
    emit(Event::ToolRead {
        message: path.to_string(),
        summary: summary.to_string(),
    })
}

fn grep(query: &str, summary: &str) -> Step {
    emit(Event::ToolGrep {
        message: query.to_string(),
        summary: summary.to_string(),
    })
}

fn glob(pattern: &str, summary: &str) -> Step {
    emit(Event::ToolGlob {
        message: pattern.to_string(),
        summary: summary.to_string(),
    })
}

pub(crate) fn script() -> Vec<Step> {
    let mut steps = vec![pause(500)];
    steps.extend(eval_task());
    steps.extend(oom_task());
    steps.extend(bench_task());
    steps
}

fn eval_task() -> Vec<Step> {
    vec![
        tokens(2_400, 1_200),
        pause(300),
        emit(Event::AgentThinking),
        pause(1_500),
        reply("I'll check the accuracy on the fine-tuned Qwen 7B model. Let me find the eval config first."),
        pause(600),
        glob("configs/**/*.yaml", "3 files"),
        pause(400),
        read("configs/eval.yaml", "28 lines"),
        pause(400),
        grep("\"qwen\" configs/", "5 matches"),
        pause(400),
        tokens(8_600, 3_400),
        pause(300),
        reply("Found the eval config. Running the benchmark now."),
        pause(600),
        command("python eval.py --model qwen-7b-ft --dataset mmlu"),
        pause(1_500),
        output("Loading model qwen-7b-ft..."),
        pause(800),
        output("Running evaluation on MMLU (14042 samples)..."),
        pause(1_200),
        output("accuracy: 0.847"),
        pause(400),
        output("f1_score: 0.839"),
        pause(400),
        output("exit status 0"),
        pause(300),
        emit(Event::CommandFinished),
        pause(500),
        tokens(24_000, 12_400),
        pause(300),
        emit(Event::AgentThinking),
        pause(1_500),
        analysis("Accuracy is 84.7% on MMLU, 2.3% above baseline. F1 is 83.9%. The fine-tuned model looks good."),
        pause(1_000),
    ]
}

fn oom_task() -> Vec<Step> {
    vec![
        emit(Event::AgentThinking),
        pause(1_800),
        reply("Now I'll investigate the OOM issue in the training loop."),
        pause(600),
        grep("\"alloc_tensor\" model/", "12 matches"),
        pause(400),
        read("model/layer3.rs", "42 lines"),
        pause(400),
        read("model/layer1.rs", "38 lines"),
        pause(300),
        glob("model/**/*_test.rs", "7 files"),
        pause(300),
        tokens(38_000, 22_000),
        pause(300),
        reply("Found the leak in model/layer3.rs line 4. Every forward pass allocates a new f32 buffer that never gets reused. I'll profile to confirm."),
        pause(800),
        command("heaptrack --analyze train.heaptrack"),
        pause(1_000),
        output("Showing top 10 allocation sites"),
        pause(400),
        output("flat   flat%   cum    cum%"),
        pause(300),
        output("512MB  40.0%   512MB  40.0%  alloc_tensor"),
        pause(300),
        output("256MB  20.0%   768MB  60.0%  forward_pass"),
        pause(300),
        output("128MB  10.0%   896MB  70.0%  backprop"),
        pause(300),
        emit(Event::CommandFinished),
        pause(500),
        tokens(48_000, 28_600),
        reply("Confirmed: alloc_tensor leaks 512MB per step. Reusing buffers from a pool."),
        pause(800),
        emit(Event::ToolEdit {
            message: "model/layer3.rs\n\n-    let buf = vec![0f32; self.size];\n+    let buf = self.pool.take(self.size);\n+    let _guard = self.pool.guard(&buf);"
                .to_string(),
        }),
        pause(800),
        reply("Patched. Running memory test to verify."),
        pause(600),
        command("cargo test layer3_memory -- --nocapture"),
        pause(1_000),
        output("running 1 test"),
        pause(600),
        output("    layer3_memory: alloc before: 512MB"),
        pause(400),
        output("    layer3_memory: alloc after:  12MB"),
        pause(400),
        output("test model::layer3::tests::layer3_memory ... ok"),
        pause(300),
        output(""),
        pause(200),
        output("test result: ok. 1 passed; 0 failed; finished in 2.34s"),
        pause(300),
        emit(Event::CommandFinished),
        pause(500),
        tokens(64_000, 40_000),
        pause(300),
        analysis("Memory dropped from 512MB to 12MB per step (97.6% reduction). Fix verified."),
        pause(1_000),
    ]
}

fn bench_task() -> Vec<Step> {
    vec![
        emit(Event::AgentThinking),
        pause(1_800),
        reply("Starting inference benchmark across batch sizes."),
        pause(600),
        read("bench/config.yaml", "15 lines"),
        pause(300),
        emit(Event::tool_error(
            "Shell",
            "$ python bench/inference_bench.py --model qwen-7b-ft\n\nTraceback (most recent call last):\n  File \"bench/inference_bench.py\", line 23, in <module>\n    model = load_model(args.model)\n  File \"bench/loader.py\", line 45, in load_model\n    raise RuntimeError(\"CUDA out of memory\")\nRuntimeError: CUDA out of memory. Tried to allocate 2.00 GiB",
        )),
        pause(1_000),
        reply("CUDA OOM on full load. I'll reduce batch size and use --half precision to fit in memory."),
        pause(800),
        command("python bench/inference_bench.py --model qwen-7b-ft --half --batch 1,8,32,128"),
        pause(800),
        output("Loading model in fp16..."),
        pause(600),
        output("Running 100 iterations per batch size..."),
        pause(800),
        output(""),
        output("Batch  Latency(ms)  Throughput(tok/s)  GPU Mem(MB)"),
        output("\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}  \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}  \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}  \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}"),
        pause(500),
        output("    1       12.4              80.6         2,048"),
        pause(400),
        output("    8       18.7             427.8         3,584"),
        pause(400),
        output("   32       42.1           1,520.4         8,192"),
        pause(400),
        output("  128      156.3           1,637.2        16,384"),
        pause(400),
        output(""),
        output("Peak throughput at batch=128: 1637.2 tok/s"),
        pause(300),
        emit(Event::CommandFinished),
        pause(500),
        tokens(88_000, 56_000),
        pause(300),
        emit(Event::ToolWrite {
            message: "bench/production.yaml\n\n+ model: qwen-7b-ft\n+ precision: fp16\n+ batch_size: 32\n+ max_vram_gb: 8\n+ throughput_target: 1500"
                .to_string(),
        }),
        pause(800),
        emit(Event::AgentThinking),
        pause(1_500),
        reply("Throughput plateaus at batch=128 (1637 tok/s) due to memory bandwidth. Batch=32 gives the best tradeoff: 1520 tok/s at 8GB VRAM."),
        pause(800),
        reply("Created bench/production.yaml with recommended settings. Use batch_size=32 with fp16 for production."),
        pause(600),
        tokens(104_000, 71_200),
    ]
}

/// Feed `steps` into the queue, scaling every pause by `pace` (0.0 plays
/// instantly). Returns early once the queue is closed.
pub(crate) fn play(queue: &EventQueue, steps: Vec<Step>, pace: f64) {
    tracing::info!(steps = steps.len(), "demo playback started");
    for step in steps {
        match step {
            Step::Pause(ms) => {
                let scaled = (ms as f64 * pace.max(0.0)) as u64;
                if scaled > 0 {
                    thread::sleep(Duration::from_millis(scaled));
                }
            }
            Step::Emit(event) => {
                if queue.send(event).is_err() {
                    tracing::debug!("demo playback stopped: queue closed");
                    return;
                }
            }
        }
    }
    tracing::info!("demo playback finished");
}

pub(crate) fn spawn(queue: EventQueue) -> thread::JoinHandle<()> {
    thread::spawn(move || play(&queue, script(), 1.0))
}
