pub(crate) mod debug;
pub(crate) mod hierarchy;
