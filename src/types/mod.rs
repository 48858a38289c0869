pub mod order;
pub mod side;
pub mod symbol;

pub use order::{MessageType, OrderMessage};
pub use side::Side;
pub use symbol::Symbol;
