pub mod particles;

pub use particles::Confetti;
