//! Acknowledgment vocabulary.
//!
//! Automation packages confirm each command by searching the output line for
//! these exact substrings, so every literal the tool can print lives in
//! [`Fragment`]'s `Display` impl and nowhere else.

use std::fmt;

/// Version reported by the `V` directive.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One piece of the acknowledgment line. Each renders with a trailing space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    LightOn,
    LightOff,
    Brightness(u8),
    Version,
    Open,
    Close,
    ProductId,
    Firmware,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::LightOn => f.write_str("LIGHT ON "),
            Fragment::LightOff => f.write_str("LIGHT OFF "),
            Fragment::Brightness(level) => write!(f, "BRIGHT {level} "),
            Fragment::Version => write!(f, "AACMD version: {VERSION} "),
            Fragment::Open => f.write_str("OPEN "),
            Fragment::Close => f.write_str("CLOSE "),
            Fragment::ProductId => f.write_str("PRODUCTID "),
            Fragment::Firmware => f.write_str("FIRMWARE "),
        }
    }
}

/// Ordered buffer of fragments, flushed once as a single line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acknowledgment {
    fragments: Vec<Fragment>,
}

impl Acknowledgment {
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// The complete output line, newline-terminated.
    pub fn line(&self) -> String {
        let mut line: String = self.fragments.iter().map(Fragment::to_string).collect();
        line.push('\n');
        line
    }
}
