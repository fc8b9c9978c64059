//! Command interpreter: dispatches directives to a panel in invocation order.
//!
//! Each token is parsed and executed before the next one is looked at, so a
//! malformed token aborts the run with earlier device effects left in place.
//! Device failures never abort: a failed `L`, `D` or `B` simply contributes no
//! fragment, which is how calling software detects the failure.

use std::time::Duration;

use hardware::FlatPanel;
use tracing::{debug, info, warn};

use crate::acknowledgment::{Acknowledgment, Fragment};
use crate::directive::{Directive, UsageError};

/// How long the process lingers after printing, unless `S` was given.
pub const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(3000);

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub acknowledgment: Acknowledgment,
    pub exit_delay: Duration,
}

impl Default for Outcome {
    fn default() -> Self {
        Self {
            acknowledgment: Acknowledgment::default(),
            exit_delay: DEFAULT_EXIT_DELAY,
        }
    }
}

/// Owns the panel session for the lifetime of the process.
pub struct Interpreter<P> {
    panel: P,
}

impl<P: FlatPanel> Interpreter<P> {
    pub fn new(panel: P) -> Self {
        Self { panel }
    }

    /// Parse and execute every token in order.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] for an empty token list or the first token that
    /// does not parse. Tokens before it have already been executed.
    pub fn run<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<Outcome, UsageError> {
        if tokens.is_empty() {
            return Err(UsageError::MissingCommands);
        }

        tokens.iter().try_fold(Outcome::default(), |mut outcome, token| {
            let directive: Directive = token.as_ref().parse()?;
            debug!("Dispatching {:?}", directive);
            self.dispatch(directive, &mut outcome);
            Ok(outcome)
        })
    }

    fn dispatch(&mut self, directive: Directive, outcome: &mut Outcome) {
        let ack = &mut outcome.acknowledgment;

        match directive {
            Directive::LightOn => match self.panel.set_light(true) {
                Ok(()) => ack.push(Fragment::LightOn),
                Err(e) => warn!("Light on failed: {}", e),
            },
            Directive::LightOff => match self.panel.set_light(false) {
                Ok(()) => ack.push(Fragment::LightOff),
                Err(e) => warn!("Light off failed: {}", e),
            },
            Directive::SetBrightness(level) => match self.panel.set_brightness(level) {
                Ok(()) => ack.push(Fragment::Brightness(level)),
                Err(e) => warn!("Set brightness {} failed: {}", level, e),
            },
            Directive::GetBrightness => {
                let level = self.panel.brightness().unwrap_or_else(|e| {
                    warn!("Brightness read failed, reporting 0: {}", e);
                    0
                });
                info!("Brightness is {}", level);
                ack.push(Fragment::Brightness(level));
            }
            Directive::Version => ack.push(Fragment::Version),
            Directive::Open => ack.push(Fragment::Open),
            Directive::Close => ack.push(Fragment::Close),
            Directive::ProductId => ack.push(Fragment::ProductId),
            Directive::Firmware => ack.push(Fragment::Firmware),
            Directive::Silent => outcome.exit_delay = Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug)]
    #[error("mock panel failure")]
    struct MockFailure;

    /// Panel that records every call and optionally fails all of them.
    #[derive(Default)]
    struct MockPanel {
        light: bool,
        level: u8,
        failing: bool,
        calls: Vec<String>,
    }

    impl MockPanel {
        fn failing() -> Self {
            Self {
                failing: true,
                ..Self::default()
            }
        }

        fn check(&self) -> Result<(), MockFailure> {
            if self.failing {
                Err(MockFailure)
            } else {
                Ok(())
            }
        }
    }

    impl FlatPanel for MockPanel {
        type Error = MockFailure;

        fn set_light(&mut self, on: bool) -> Result<(), MockFailure> {
            self.calls.push(format!("light {on}"));
            self.check()?;
            self.light = on;
            Ok(())
        }

        fn set_brightness(&mut self, level: u8) -> Result<(), MockFailure> {
            self.calls.push(format!("brightness {level}"));
            self.check()?;
            self.level = level;
            Ok(())
        }

        fn brightness(&mut self) -> Result<u8, MockFailure> {
            self.calls.push("read".to_string());
            self.check()?;
            Ok(self.level)
        }
    }

    fn run(panel: MockPanel, tokens: &[&str]) -> (Result<Outcome, UsageError>, MockPanel) {
        let mut interpreter = Interpreter::new(panel);
        let result = interpreter.run(tokens);
        (result, interpreter.panel)
    }

    #[test]
    fn test_light_on_with_brightness_silent() {
        let (result, panel) = run(MockPanel::default(), &["L", "B200", "S"]);
        let outcome = result.unwrap();
        assert_eq!(outcome.acknowledgment.line(), "LIGHT ON BRIGHT 200 \n");
        assert_eq!(outcome.exit_delay, Duration::ZERO);
        assert!(panel.light);
        assert_eq!(panel.level, 200);
    }

    #[test]
    fn test_light_off_silent() {
        let (result, _) = run(MockPanel::default(), &["D", "S"]);
        let outcome = result.unwrap();
        assert_eq!(outcome.acknowledgment.line(), "LIGHT OFF \n");
        assert_eq!(outcome.exit_delay, Duration::ZERO);
    }

    #[test]
    fn test_delay_without_silent() {
        let (result, _) = run(MockPanel::default(), &["V"]);
        let outcome = result.unwrap();
        assert_eq!(outcome.exit_delay, Duration::from_millis(3000));
        assert!(outcome
            .acknowledgment
            .line()
            .contains("AACMD version: 3.14.16"));
    }

    #[test]
    fn test_silent_anywhere_in_sequence() {
        let (result, _) = run(MockPanel::default(), &["S", "L"]);
        assert_eq!(result.unwrap().exit_delay, Duration::ZERO);
    }

    #[test]
    fn test_lowercase_tokens() {
        let (result, _) = run(MockPanel::default(), &["l", "b34", "s"]);
        assert_eq!(
            result.unwrap().acknowledgment.line(),
            "LIGHT ON BRIGHT 34 \n"
        );
    }

    #[test]
    fn test_placeholders_do_not_touch_panel() {
        let (result, panel) = run(MockPanel::default(), &["O", "C", "P", "F", "V"]);
        assert_eq!(
            result.unwrap().acknowledgment.line(),
            "OPEN CLOSE PRODUCTID FIRMWARE AACMD version: 3.14.16 \n"
        );
        assert!(panel.calls.is_empty());
    }

    #[test]
    fn test_failed_operations_are_omitted_and_do_not_abort() {
        let (result, panel) = run(MockPanel::failing(), &["L", "B100", "D", "V", "S"]);
        let outcome = result.unwrap();
        assert_eq!(
            outcome.acknowledgment.line(),
            "AACMD version: 3.14.16 \n"
        );
        assert_eq!(panel.calls, ["light true", "brightness 100", "light false"]);
    }

    #[test]
    fn test_get_brightness_reports_device_value() {
        let panel = MockPanel {
            level: 77,
            ..MockPanel::default()
        };
        let (result, _) = run(panel, &["G", "S"]);
        assert_eq!(result.unwrap().acknowledgment.line(), "BRIGHT 77 \n");
    }

    #[test]
    fn test_get_brightness_always_appended() {
        let (result, _) = run(MockPanel::failing(), &["G"]);
        assert_eq!(
            result.unwrap().acknowledgment.fragments(),
            [Fragment::Brightness(0)]
        );
    }

    #[test]
    fn test_only_silent_gives_empty_line() {
        let (result, panel) = run(MockPanel::default(), &["S"]);
        assert_eq!(result.unwrap().acknowledgment.line(), "\n");
        assert!(panel.calls.is_empty());
    }

    #[test]
    fn test_bad_brightness_after_light_on_keeps_effect() {
        let (result, panel) = run(MockPanel::default(), &["L", "B300", "S"]);
        assert_eq!(result, Err(UsageError::BrightnessOutOfRange(300)));
        assert!(panel.light);
        assert_eq!(panel.calls, ["light true"]);
    }

    #[test]
    fn test_non_numeric_brightness_is_usage_error() {
        let (result, panel) = run(MockPanel::default(), &["Babc"]);
        assert_eq!(
            result,
            Err(UsageError::InvalidBrightness("abc".to_string()))
        );
        assert!(panel.calls.is_empty());
    }

    #[test]
    fn test_unknown_directive_stops_dispatch() {
        let (result, panel) = run(MockPanel::default(), &["D", "X", "L"]);
        assert_eq!(result, Err(UsageError::UnknownDirective("X".to_string())));
        assert_eq!(panel.calls, ["light false"]);
    }

    #[test]
    fn test_no_tokens() {
        let (result, _) = run(MockPanel::default(), &[]);
        assert_eq!(result, Err(UsageError::MissingCommands));
    }

    #[test]
    fn test_repeated_sequence_is_idempotent() {
        let mut interpreter = Interpreter::new(MockPanel::default());
        let tokens = ["L", "B120", "G", "S"];
        let first = interpreter.run(&tokens).unwrap();
        let second = interpreter.run(&tokens).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.acknowledgment.line(), "LIGHT ON BRIGHT 120 BRIGHT 120 \n");
    }
}
