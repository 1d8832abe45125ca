#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activation(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateChange(pub bool);
