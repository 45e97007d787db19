pub mod cucumber;
