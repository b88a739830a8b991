use crate::error::TavleError;

pub type TavleResult<T> = Result<T, TavleError>;
