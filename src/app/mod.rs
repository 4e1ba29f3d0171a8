pub mod bootstrap;
pub mod run;
