use super::Component;

const DOT_FRAMES: [&str; 8] = [
    "\u{28fe}", "\u{28fd}", "\u{28fb}", "\u{28bf}", "\u{287f}", "\u{28df}", "\u{28ef}", "\u{28f7}",
];

/// Animation driver for the thinking placeholder. One `update` = one tick.
#[derive(Clone, Debug, Default)]
pub(crate) struct Spinner {
    idx: usize,
}

impl Spinner {
    pub(crate) fn frame(&self) -> &'static str {
        DOT_FRAMES[self.idx % DOT_FRAMES.len()]
    }
}

impl Component for Spinner {
    type Input = ();
    type Effect = ();

    fn update(&mut self, _input: ()) {
        self.idx = (self.idx + 1) % DOT_FRAMES.len();
    }

    fn view(&self) -> String {
        self.frame().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_cycle_through_frames() {
        let mut spinner = Spinner::default();
        let first = spinner.view();
        for _ in 0..DOT_FRAMES.len() {
            spinner.update(());
        }
        assert_eq!(spinner.view(), first);
        spinner.update(());
        assert_ne!(spinner.view(), first);
    }
}
