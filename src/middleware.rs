pub mod recover;
