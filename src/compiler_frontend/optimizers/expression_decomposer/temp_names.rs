use crate::compiler_frontend::optimizers::expression_decomposer::ExpressionDecomposer;
use crate::projects::settings::CONSTANT_TEMP_MARKER;

impl ExpressionDecomposer<'_> {
    /// Temporary that may be assigned more than once
    pub(crate) fn temp_value_name(&mut self) -> String {
        format!("{}{}", self.temp_name_prefix, self.id_supplier.next_id())
    }

    /// Temporary assigned exactly once, registered so later safety checks treat it as constant
    pub(crate) fn temp_constant_value_name(&mut self) -> String {
        let name = format!(
            "{}{CONSTANT_TEMP_MARKER}{}",
            self.temp_name_prefix,
            self.id_supplier.next_id()
        );
        self.known_constants.insert(name.clone());
        name
    }
}
