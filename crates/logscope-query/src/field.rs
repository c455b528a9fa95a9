use std::fmt;
use std::str::FromStr;

use logscope_types::UnknownToken;

/// A record field that can be projected or filtered on in a query
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Ip,
    User,
    Date,
    Event,
    Status,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Self::Ip,
        Self::User,
        Self::Date,
        Self::Event,
        Self::Status,
    ];

    /// Keyword used in query text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::User => "user",
            Self::Date => "date",
            Self::Event => "event",
            Self::Status => "status",
        }
    }
}

impl FromStr for Field {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownToken {
                kind: "field",
                token: s.to_string(),
            })
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
