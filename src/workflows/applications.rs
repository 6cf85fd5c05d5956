//! Application lifecycle.
//!
//! created → opted in (per account) → called → closed out or cleared
//! (per account) → deleted. The transition rules live in the approval
//! program; nothing is checked here.

use crate::blockchain::{LedgerError, LedgerResult};
use crate::transaction::{ApplicationCall, OnComplete, StateSchema, TransactionSigner};
use crate::workflows::{Confirmation, WorkflowRunner};

/// Programs and storage allocation of a new application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationSpec {
    pub approval_program: Vec<u8>,
    pub clear_program: Vec<u8>,
    pub global_schema: StateSchema,
    pub local_schema: StateSchema,
    pub extra_pages: u32,
    pub args: Vec<Vec<u8>>,
}

impl ApplicationSpec {
    pub fn new(approval_program: Vec<u8>, clear_program: Vec<u8>) -> Self {
        Self {
            approval_program,
            clear_program,
            ..Self::default()
        }
    }

    pub fn global_schema(mut self, num_uints: u64, num_byte_slices: u64) -> Self {
        self.global_schema = StateSchema::new(num_uints, num_byte_slices);
        self
    }

    pub fn local_schema(mut self, num_uints: u64, num_byte_slices: u64) -> Self {
        self.local_schema = StateSchema::new(num_uints, num_byte_slices);
        self
    }

    pub fn args(mut self, args: Vec<Vec<u8>>) -> Self {
        self.args = args;
        self
    }
}

impl WorkflowRunner {
    /// Deploy an application; returns its id with the confirmation.
    pub async fn create_application(
        &self,
        creator: &dyn TransactionSigner,
        spec: ApplicationSpec,
    ) -> LedgerResult<(u64, Confirmation)> {
        self.run("create_application", async {
            let call = ApplicationCall::create(
                spec.approval_program,
                spec.clear_program,
                spec.global_schema,
                spec.local_schema,
            )
            .extra_pages(spec.extra_pages)
            .args(spec.args);
            let txn = self.build(creator.address(), call).await?;
            let confirmation = self.sign_and_submit("create_application", &txn, creator).await?;
            let app_id = confirmation.application_id().ok_or_else(|| {
                LedgerError::Decode("confirmation carries no application index".to_string())
            })?;
            tracing::info!(app_id, "Application created");
            Ok((app_id, confirmation))
        })
        .await
    }

    pub async fn opt_in_application(
        &self,
        account: &dyn TransactionSigner,
        app_id: u64,
    ) -> LedgerResult<Confirmation> {
        self.lifecycle_call("opt_in_application", account, app_id, OnComplete::OptIn)
            .await
    }

    /// NoOp call with raw arguments.
    pub async fn call_application(
        &self,
        caller: &dyn TransactionSigner,
        app_id: u64,
        args: Vec<Vec<u8>>,
    ) -> LedgerResult<Confirmation> {
        self.run("call_application", async {
            let txn = self
                .build(caller.address(), ApplicationCall::call(app_id).args(args))
                .await?;
            let confirmation = self.sign_and_submit("call_application", &txn, caller).await?;
            if !confirmation.record.logs.is_empty() {
                tracing::info!(app_id, logs = confirmation.record.logs.len(), "Application logged");
            }
            Ok(confirmation)
        })
        .await
    }

    /// Replace both programs; the approval program decides who may.
    pub async fn update_application(
        &self,
        creator: &dyn TransactionSigner,
        app_id: u64,
        approval_program: Vec<u8>,
        clear_program: Vec<u8>,
    ) -> LedgerResult<Confirmation> {
        self.run("update_application", async {
            let call = ApplicationCall::update(app_id, approval_program, clear_program);
            let txn = self.build(creator.address(), call).await?;
            self.sign_and_submit("update_application", &txn, creator).await
        })
        .await
    }

    /// Leave the application; the approval program may refuse.
    pub async fn close_out_application(
        &self,
        account: &dyn TransactionSigner,
        app_id: u64,
    ) -> LedgerResult<Confirmation> {
        self.lifecycle_call("close_out_application", account, app_id, OnComplete::CloseOut)
            .await
    }

    /// Forced exit: local state is removed even if the clear program fails.
    pub async fn clear_application(
        &self,
        account: &dyn TransactionSigner,
        app_id: u64,
    ) -> LedgerResult<Confirmation> {
        self.lifecycle_call("clear_application", account, app_id, OnComplete::ClearState)
            .await
    }

    pub async fn delete_application(
        &self,
        creator: &dyn TransactionSigner,
        app_id: u64,
    ) -> LedgerResult<Confirmation> {
        self.lifecycle_call(
            "delete_application",
            creator,
            app_id,
            OnComplete::DeleteApplication,
        )
        .await
    }

    async fn lifecycle_call(
        &self,
        operation: &'static str,
        signer: &dyn TransactionSigner,
        app_id: u64,
        on_complete: OnComplete,
    ) -> LedgerResult<Confirmation> {
        self.run(operation, async {
            let call = ApplicationCall::with_on_complete(app_id, on_complete);
            let txn = self.build(signer.address(), call).await?;
            self.sign_and_submit(operation, &txn, signer).await
        })
        .await
    }
}
