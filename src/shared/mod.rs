// src/shared/mod.rs

// Declara o submódulo com as estruturas compartilhadas entre os módulos
pub mod shared_structs;
