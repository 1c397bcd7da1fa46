use serde::Deserialize;

use super::value_dto::ValueDto;

/// Name/value pair from a command history entry's `attr[]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandAttributeDto {
    pub name: String,
    pub value: ValueDto,
}
