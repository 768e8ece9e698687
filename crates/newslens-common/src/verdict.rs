//! Fact-check verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical fact-check outcome.
///
/// Deserialisation is lenient: `"Mostly True"`, `"mostly-true"` and
/// `"MOSTLY_TRUE"` all map to [`Verdict::MostlyTrue`]; anything unrecognised
/// becomes [`Verdict::Unverified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Verdict {
    True,
    MostlyTrue,
    Mixed,
    MostlyFalse,
    False,
    Unverified,
    Opinion,
}

impl Verdict {
    pub fn parse(raw: &str) -> Self {
        let norm: String = raw
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match norm.as_str() {
            "true"         => Verdict::True,
            "mostly_true"  => Verdict::MostlyTrue,
            "mixed"        => Verdict::Mixed,
            "mostly_false" => Verdict::MostlyFalse,
            "false"        => Verdict::False,
            "opinion"      => Verdict::Opinion,
            _              => Verdict::Unverified,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::True        => "true",
            Verdict::MostlyTrue  => "mostly_true",
            Verdict::Mixed       => "mixed",
            Verdict::MostlyFalse => "mostly_false",
            Verdict::False       => "false",
            Verdict::Unverified  => "unverified",
            Verdict::Opinion     => "opinion",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::True        => "True",
            Verdict::MostlyTrue  => "Mostly True",
            Verdict::Mixed       => "Mixed",
            Verdict::MostlyFalse => "Mostly False",
            Verdict::False       => "False",
            Verdict::Unverified  => "Unverified",
            Verdict::Opinion     => "Opinion",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Verdict::True | Verdict::MostlyTrue  => "verdict-true",
            Verdict::Mixed                       => "verdict-mixed",
            Verdict::MostlyFalse | Verdict::False => "verdict-false",
            Verdict::Unverified                  => "verdict-unverified",
            Verdict::Opinion                     => "verdict-opinion",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Verdict::True | Verdict::MostlyTrue   => "✓",
            Verdict::Mixed                        => "◐",
            Verdict::MostlyFalse | Verdict::False => "✗",
            Verdict::Unverified                   => "?",
            Verdict::Opinion                      => "💬",
        }
    }
}

impl From<String> for Verdict {
    fn from(raw: String) -> Self {
        Verdict::parse(&raw)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
