use crate::forms::FormError;
use crate::model::Modem;
use resource_store::{AtomicRequest, Operation, Resource, StoreError};
use serde_json::{Map, Value};

/// Whether the form creates a modem or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Update,
}

/// Editable attributes of a modem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModemForm {
    pub name: String,
}

impl ModemForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Pre-fills the form from a cached modem.
    pub async fn from_modem(modem: &Modem) -> Result<Self, StoreError> {
        Ok(Self {
            name: modem.name().await?.unwrap_or_default(),
        })
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::validation("Please enter a name for the modem"));
        }
        Ok(())
    }

    /// Builds the atomic request. Validation runs first, so an invalid form
    /// never produces a request.
    pub fn assemble(
        &self,
        mode: FormMode,
        current: Option<&Modem>,
    ) -> Result<AtomicRequest, FormError> {
        self.validate()?;

        let mut attributes = Map::new();
        attributes.insert("name".into(), Value::String(self.name.trim().to_string()));

        let operation = match mode {
            FormMode::Add => Operation::add(Modem::TYPE, attributes),
            FormMode::Update => {
                let modem = current.ok_or_else(|| {
                    FormError::validation("Cannot update a modem without a modem")
                })?;
                Operation::update(Modem::TYPE, modem.id(), attributes)
            }
        };
        Ok(AtomicRequest::new(vec![operation]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_store::OpKind;

    #[test]
    fn blank_name_fails_validation() {
        let form = ModemForm::new("   ");

        let error = form.assemble(FormMode::Add, None).unwrap_err();

        assert_eq!(error.user_message(), "Please enter a name for the modem");
    }

    #[test]
    fn add_has_no_id_and_trims_the_name() {
        let request = ModemForm::new("  Snapdragon X75 ")
            .assemble(FormMode::Add, None)
            .unwrap();

        let operation = &request.operations[0];
        assert_eq!(operation.op, OpKind::Add);
        assert_eq!(operation.data.kind, "modems");
        assert_eq!(operation.data.id, None);
        assert_eq!(operation.data.attributes["name"], "Snapdragon X75");
    }

    #[test]
    fn update_requires_a_modem() {
        let error = ModemForm::new("X75")
            .assemble(FormMode::Update, None)
            .unwrap_err();

        assert_eq!(
            error,
            FormError::validation("Cannot update a modem without a modem")
        );
    }
}
