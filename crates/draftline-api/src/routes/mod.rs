pub mod cases;
pub mod drafts;
pub mod health;
pub mod messages;
pub mod threads;
