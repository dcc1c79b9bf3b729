use crate::TableError;

/// Construction parameters of a [`HashTable`](crate::HashTable).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Initial number of buckets, must be positive. Only ever doubles.
    pub capacity: usize,
    /// Resize threshold for `len / capacity`, must lie in `(0, 1]`.
    pub max_load_factor: f64,
    /// Initial capacity of the value array created for every new key.
    pub values_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            max_load_factor: 0.75,
            values_capacity: 5,
        }
    }
}

impl TableConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn with_values_capacity(mut self, values_capacity: usize) -> Self {
        self.values_capacity = values_capacity;
        self
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.capacity == 0 {
            return Err(TableError::InvalidArgument("capacity must be positive"));
        }
        // written this way so that NaN is rejected too
        if !(self.max_load_factor > 0.0 && self.max_load_factor <= 1.0) {
            return Err(TableError::InvalidArgument(
                "max load factor must be in (0, 1]",
            ));
        }
        if self.values_capacity == 0 {
            return Err(TableError::InvalidArgument(
                "values capacity must be positive",
            ));
        }
        Ok(())
    }
}
