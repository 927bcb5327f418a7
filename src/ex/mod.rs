pub use ids::Generator;
pub use ids::SequenceGenerator;
pub use ids::UuidGenerator;
pub use timer::sleep;
pub use timer::Timeout;

pub mod ids;
pub mod timer;
