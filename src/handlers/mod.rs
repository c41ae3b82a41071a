pub mod helpers;
pub mod wizard;
