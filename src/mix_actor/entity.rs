use chrono::Utc;

use super::error::MixError;
use crate::actor_framework::Entity;
use crate::domain::{CustomMix, MixCreate, MixId};

impl Entity for CustomMix {
    type Id = MixId;
    type CreateParams = MixCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();
    type Error = MixError;

    fn id(&self) -> &MixId {
        &self.id
    }

    fn from_create(id: MixId, params: MixCreate) -> Result<Self, MixError> {
        if params.name.trim().is_empty() {
            return Err(MixError::MissingName);
        }
        if params.ingredients.is_empty() {
            return Err(MixError::EmptyMix);
        }

        Ok(Self {
            id,
            owner: params.owner,
            name: params.name.trim().to_string(),
            ingredients: params.ingredients,
            total_price: params.totals.price,
            total_weight: params.totals.weight,
            total_calories: params.totals.calories,
            is_saved: true,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), MixError> {
        Err(MixError::Immutable)
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), MixError> {
        Err(MixError::Immutable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, MixIngredient, MixTotals, ProductId};
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    fn params(name: &str, ingredients: Vec<MixIngredient>) -> MixCreate {
        MixCreate {
            owner: AccountId::new(),
            name: name.to_string(),
            ingredients,
            totals: MixTotals { price: dec!(3.50), weight: dec!(1), calories: 1900 },
        }
    }

    fn granola() -> MixIngredient {
        MixIngredient {
            product: ProductId::new(),
            product_name: "Granola".to_string(),
            quantity_lbs: dec!(1),
            price_at_moment: dec!(3.50),
        }
    }

    #[test]
    fn from_create_freezes_totals() -> TestResult {
        let mix = CustomMix::from_create(MixId::new(), params(" Morning ", vec![granola()]))?;

        assert_eq!(mix.name, "Morning");
        assert_eq!(mix.total_price, dec!(3.50));
        assert_eq!(mix.total_calories, 1900);
        assert!(mix.is_saved);
        Ok(())
    }

    #[test]
    fn blank_names_and_empty_recipes_are_rejected() {
        assert_eq!(
            CustomMix::from_create(MixId::new(), params("  ", vec![granola()])).err(),
            Some(MixError::MissingName)
        );
        assert_eq!(
            CustomMix::from_create(MixId::new(), params("Plain", Vec::new())).err(),
            Some(MixError::EmptyMix)
        );
    }

    #[test]
    fn stored_mixes_are_immutable() -> TestResult {
        let mut mix = CustomMix::from_create(MixId::new(), params("Morning", vec![granola()]))?;

        assert_eq!(mix.on_update(()), Err(MixError::Immutable));
        Ok(())
    }
}
