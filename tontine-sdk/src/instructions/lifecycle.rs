use tontine_core::Action;
use tontine_types::Address;

use crate::{
    core::{SdkError, SdkResult},
    instructions::{address_arg, u64_arg, EntryFunctionPayload, PayloadBuilder},
};

impl PayloadBuilder {
    pub fn contribute(&self, tontine: &Address, amount_octa: u64) -> SdkResult<EntryFunctionPayload> {
        positive("amount_octa", amount_octa)?;
        Ok(self.call(
            Action::Contribute.entry_function(),
            vec![address_arg(tontine), u64_arg(amount_octa)],
        ))
    }

    pub fn withdraw(&self, tontine: &Address, amount_octa: u64) -> SdkResult<EntryFunctionPayload> {
        positive("amount_octa", amount_octa)?;
        Ok(self.call(
            Action::Withdraw.entry_function(),
            vec![address_arg(tontine), u64_arg(amount_octa)],
        ))
    }

    pub fn leave(&self, tontine: &Address) -> EntryFunctionPayload {
        self.tontine_only(Action::Leave, tontine)
    }

    pub fn lock(&self, tontine: &Address) -> EntryFunctionPayload {
        self.tontine_only(Action::Lock, tontine)
    }

    pub fn check_in(&self, tontine: &Address) -> EntryFunctionPayload {
        self.tontine_only(Action::CheckIn, tontine)
    }

    pub fn claim(&self, tontine: &Address) -> EntryFunctionPayload {
        self.tontine_only(Action::Claim, tontine)
    }

    pub fn execute_fallback(&self, tontine: &Address) -> EntryFunctionPayload {
        self.tontine_only(Action::ExecuteFallback, tontine)
    }

    /// Payload for any lifecycle action. Contribute and withdraw need an amount.
    pub fn for_action(
        &self,
        action: Action,
        tontine: &Address,
        amount_octa: Option<u64>,
    ) -> SdkResult<EntryFunctionPayload> {
        let amount = || {
            amount_octa.ok_or_else(|| {
                SdkError::InvalidParameters(format!("{} requires an amount", action))
            })
        };

        match action {
            Action::Contribute => self.contribute(tontine, amount()?),
            Action::Withdraw => self.withdraw(tontine, amount()?),
            Action::Leave
            | Action::Lock
            | Action::CheckIn
            | Action::Claim
            | Action::ExecuteFallback => Ok(self.tontine_only(action, tontine)),
        }
    }

    fn tontine_only(&self, action: Action, tontine: &Address) -> EntryFunctionPayload {
        self.call(action.entry_function(), vec![address_arg(tontine)])
    }
}

fn positive(parameter: &str, value: u64) -> SdkResult<()> {
    if value == 0 {
        return Err(SdkError::InvalidParameters(format!("{} must be positive", parameter)));
    }
    Ok(())
}
