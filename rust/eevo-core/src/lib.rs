pub mod eevo;
