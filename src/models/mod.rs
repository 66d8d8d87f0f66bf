pub mod city;
pub mod faculty;
pub mod job;
pub mod major;
pub mod province;
pub mod role;
pub mod user;
