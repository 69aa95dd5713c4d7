pub mod compile;
pub mod grade;
pub mod init;
pub mod problems;
pub mod sort;
pub mod template;
