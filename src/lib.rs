//! Lazy sequence adapters over any pull-based source, with an explicit [`StatePolicy`]
//! deciding whether an operator's result shares, copies or takes over the source
//! wrapper's iteration state.

use std::str::FromStr;

mod cursor;
mod err;
mod iter;
mod op;

pub use err::RiErr;
pub use iter::RichIter;
pub use itertools::EitherOrBoth;

/// How deriving a new sequence from a wrapper affects the wrapper's own state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatePolicy {
    /// Derived and source wrapper pull from the same underlying cursor.
    Share,
    /// The cursor is forked first; derived and source proceed independently.
    Copy,
    /// The derived wrapper takes the cursor; the source becomes unusable.
    Transfer,
}

impl FromStr for StatePolicy {
    type Err = RiErr;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "share" => Ok(StatePolicy::Share),
            "copy" => Ok(StatePolicy::Copy),
            "transfer" => Ok(StatePolicy::Transfer),
            _ => Err(RiErr::ParsePolicyErr(s.to_owned())),
        }
    }
}

pub type RiRes<T> = Result<T, RiErr>;
