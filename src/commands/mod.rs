pub mod replay;
pub mod slots;
pub mod snap;
pub mod view;
pub mod waitlist;
