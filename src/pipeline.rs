//! Ties the phases together: scan a header directory, consolidate the
//! per-file tables into one model, then run the classification passes in
//! order. Later passes read earlier passes' output, so the order is fixed.

use std::path::Path;

use log::info;

use crate::analysis::{self, ExpansionConfig};
use crate::error::Result;
use crate::model::{ResolvedModel, StructFacts};
use crate::scanner;

#[derive(Debug, Default)]
pub struct Pipeline {
    pub config: ExpansionConfig,
}

impl Pipeline {
    pub fn new(config: ExpansionConfig) -> Self {
        Pipeline { config }
    }

    pub fn run(&self, dir: &Path) -> Result<ResolvedModel> {
        let (tables, versions) = scanner::scan_dir(dir)?;
        info!(
            "scanned {} files, {} version macros",
            tables.len(),
            versions.len()
        );

        let mut diagnostics = crate::model::defaults::validate_tables();
        let model = analysis::consolidate(&tables, versions, &mut diagnostics);

        let roles = analysis::roles::classify(&model, &mut diagnostics);
        let requirements = analysis::requirements::derive(&model, &roles);
        let expanded = analysis::expansion::decide(&model, &roles, &self.config);
        let field_roles = analysis::field_roles::resolve(&model, &mut diagnostics)?;

        let facts: Vec<StructFacts> = model
            .structs()
            .map(|(id, decl)| {
                let i = id.0 as usize;
                StructFacts {
                    name: decl.name.clone(),
                    roles: roles[i],
                    requirements: requirements[i],
                    expanded: expanded[i],
                    field_roles: field_roles[i].clone(),
                }
            })
            .collect();

        let resolved = ResolvedModel {
            model,
            facts,
            diagnostics,
        };
        info!("resolved model:\n{}", resolved.summary());
        Ok(resolved)
    }
}
