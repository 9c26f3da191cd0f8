pub mod chat;
pub mod index;
pub mod new_student;
pub mod roster_table;
pub mod sse;
pub mod students;
