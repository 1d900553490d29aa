pub mod expenses;
pub mod flows;
pub mod orders;
pub mod payroll;
pub mod technicians;
