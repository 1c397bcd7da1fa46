pub mod archive_page;
pub mod command_dto;
pub mod parameter_value_dto;
pub mod value_dto;
