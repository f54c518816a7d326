//! Operation handlers shared by every interface.

use log::debug;

use super::Planner;
use crate::{
    chunking,
    compress,
    display::Issues,
    error::Result,
    models::{ChunkResult, CompressionReport},
    params::{ChunkScope, ChunkStep, CompressPlan, ValidatePlan},
};

impl Planner {
    /// Compresses a plan, filling unset limits from configuration.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use lodestar_core::{params::CompressPlan, PlannerBuilder};
    /// # fn run(plan: lodestar_core::models::Plan) -> lodestar_core::Result<()> {
    /// let planner = PlannerBuilder::new().build()?;
    /// let report = planner.compress_plan(&CompressPlan {
    ///     plan,
    ///     limits: Default::default(),
    /// })?;
    /// println!("{}", report.compact_encoding);
    /// # Ok(())
    /// # }
    /// ```
    pub fn compress_plan(&self, params: &CompressPlan) -> Result<CompressionReport> {
        let limits = params.limits.or(self.config.compression);
        debug!("compress_plan with {limits:?}");
        compress::compress(&params.plan, &limits)
    }

    /// Checks a plan against every structural invariant.
    pub fn validate_plan(&self, params: &ValidatePlan) -> Issues {
        Issues(compress::validate_plan(&params.plan))
    }

    /// Chunks the code behind a scope of the plan.
    ///
    /// # Errors
    ///
    /// `ScopeNotFound` if the scope id is not in the plan, `InvalidInput`
    /// for zero limits.
    pub fn chunk_scope(&self, params: &ChunkScope) -> Result<ChunkResult> {
        let options = params.options.apply(self.config.chunking);
        debug!("chunk_scope {} with {options:?}", params.scope_id);
        chunking::chunk_scope(&params.plan, &params.scope_id, &options, self.index.as_deref())
    }

    /// Chunks the code behind the scope of a step.
    ///
    /// # Errors
    ///
    /// `StepNotFound` if the step id is not in the plan, `InvalidInput` for
    /// zero limits.
    pub fn chunk_step(&self, params: &ChunkStep) -> Result<ChunkResult> {
        let options = params.options.apply(self.config.chunking);
        debug!("chunk_step {} with {options:?}", params.step_id);
        chunking::chunk_step(&params.plan, &params.step_id, &options, self.index.as_deref())
    }
}
