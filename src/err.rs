use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RiErr {
    /// Normal end of the underlying sequence; a control signal, not a failure.
    #[error("[End] No elements remain in the sequence")]
    Exhausted,

    /// The wrapper's state was transferred to a derived sequence.
    #[error("[Unusable] Iterator can no longer be used")]
    Unusable,

    #[error("[Bad Arg] Bad value `{arg_value}` in argument `{arg}` of op `{op}`")]
    BadArg { op: &'static str, arg: &'static str, arg_value: String },

    #[error("[Bad Policy] Unknown state policy `{0}`, expected `share`, `copy` or `transfer`")]
    ParsePolicyErr(String),
}
