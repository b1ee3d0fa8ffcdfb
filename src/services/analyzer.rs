//! Project analyzer
//!
//! Scans the ruleset's recognized locations (never an unrestricted walk),
//! classifies what it finds, and assembles a migration plan by applying
//! the strategy. Analysis is read-only; the plan it produces is pure data.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, MigrateResult};
use crate::models::{
    ActionKind, Analysis, ArtifactKind, ConfigArtifact, MigrationAction, MigrationPlan,
    MigrationStrategy, Risk, RiskKind,
};
use crate::report::Reporter;
use crate::rules::{Ruleset, ScanLocation};
use crate::storage::file_io;

/// One scanned file: its classified artifact record plus raw content
#[derive(Debug, Clone)]
pub struct ScannedArtifact {
    pub artifact: ConfigArtifact,
    pub content: Vec<u8>,
}

/// Read-only scan over the ruleset's recognized locations
///
/// Fails with an analysis error if the root is missing or any recognized
/// file cannot be read; a scan is one consistent pass or nothing.
pub(crate) fn scan_project(
    rules: &dyn Ruleset,
    root: &Path,
) -> MigrateResult<BTreeMap<PathBuf, ScannedArtifact>> {
    if !root.is_dir() {
        return Err(MigrateError::analysis(format!(
            "project root does not exist or is not a directory: {}",
            root.display()
        )));
    }

    let mut scanned = BTreeMap::new();

    for location in rules.locations() {
        match location {
            ScanLocation::File(rel) => {
                probe_file(rules, root, rel, &mut scanned)?;
            }
            ScanLocation::Dir(rel) => {
                let abs = root.join(&rel);
                if !abs.is_dir() {
                    continue;
                }
                let entries = fs::read_dir(&abs).map_err(|e| {
                    MigrateError::analysis(format!("failed to read {}: {}", abs.display(), e))
                })?;
                for entry in entries {
                    let entry = entry.map_err(|e| {
                        MigrateError::analysis(format!(
                            "failed to read directory entry in {}: {}",
                            abs.display(),
                            e
                        ))
                    })?;
                    if entry.path().is_file() {
                        probe_file(rules, root, rel.join(entry.file_name()), &mut scanned)?;
                    }
                }
            }
        }
    }

    Ok(scanned)
}

fn probe_file(
    rules: &dyn Ruleset,
    root: &Path,
    rel: PathBuf,
    scanned: &mut BTreeMap<PathBuf, ScannedArtifact>,
) -> MigrateResult<()> {
    let abs = root.join(&rel);
    if !abs.is_file() {
        return Ok(());
    }

    let content = file_io::read_bytes(&abs)
        .map_err(|e| MigrateError::analysis(format!("failed to read {}: {}", abs.display(), e)))?;
    let kind = rules.classify(&rel, &content);
    let artifact = ConfigArtifact::new(rel.clone(), kind, &content);

    scanned.insert(rel, ScannedArtifact { artifact, content });
    Ok(())
}

/// Computes analyses: scan, classify, plan, score
pub struct Analyzer<'a> {
    rules: &'a dyn Ruleset,
    reporter: &'a dyn Reporter,
}

impl<'a> Analyzer<'a> {
    pub fn new(rules: &'a dyn Ruleset, reporter: &'a dyn Reporter) -> Self {
        Self { rules, reporter }
    }

    /// Analyze a project root under a strategy
    pub fn analyze(&self, root: &Path, strategy: MigrationStrategy) -> MigrateResult<Analysis> {
        let scanned = scan_project(self.rules, root)?;
        let (plan, risks) = self.assemble_plan(strategy, &scanned)?;

        let artifacts: Vec<ConfigArtifact> =
            scanned.into_values().map(|s| s.artifact).collect();

        let analysis = Analysis::new(root, artifacts, plan, risks);

        let counts = analysis.counts();
        self.reporter.info(&format!(
            "Scanned {} artifact(s): {} legacy, {} current, {} custom, {} unknown",
            counts.total(),
            counts.legacy,
            counts.current,
            counts.custom,
            counts.unknown
        ));
        for risk in &analysis.risks {
            self.reporter.detail(&risk.to_string());
        }

        Ok(analysis)
    }

    /// Serialize an analysis to a file; format follows the extension
    ///
    /// `.yaml`/`.yml` write YAML, anything else writes pretty JSON. The
    /// write is atomic and deterministic for a given analysis, so saving
    /// twice is idempotent.
    pub fn save_analysis(&self, analysis: &Analysis, dest: &Path) -> MigrateResult<()> {
        let rendered = match dest.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::to_string(analysis)?,
            _ => serde_json::to_string_pretty(analysis)? + "\n",
        };
        file_io::write_atomic(dest, rendered.as_bytes())?;
        self.reporter
            .info(&format!("Saved analysis to {}", dest.display()));
        Ok(())
    }

    /// Turn a scan into an ordered, conflict-free plan plus risks
    fn assemble_plan(
        &self,
        strategy: MigrationStrategy,
        scanned: &BTreeMap<PathBuf, ScannedArtifact>,
    ) -> MigrateResult<(MigrationPlan, Vec<Risk>)> {
        let mut intents: BTreeMap<PathBuf, MigrationAction> = BTreeMap::new();
        let mut risks = Vec::new();

        for (path, s) in scanned {
            let artifact = &s.artifact;
            match artifact.kind {
                ArtifactKind::Unknown => {
                    risks.push(Risk::new(
                        RiskKind::UnknownFormat,
                        path.clone(),
                        "content is not recognizable; it will be skipped",
                    ));
                    push_intent(
                        &mut intents,
                        skip_with_prior(path, "unrecognized content", artifact),
                    )?;
                }
                ArtifactKind::Current => {
                    push_intent(
                        &mut intents,
                        skip_with_prior(path, "already in current scheme", artifact),
                    )?;
                }
                ArtifactKind::Custom => {
                    self.plan_custom(strategy, path, artifact, &mut intents, &mut risks)?;
                }
                ArtifactKind::Legacy => {
                    self.plan_legacy(strategy, path, s, scanned, &mut intents, &mut risks)?;
                }
            }
        }

        let plan = MigrationPlan::new(strategy, intents.into_values().collect())?;
        Ok((plan, risks))
    }

    fn plan_custom(
        &self,
        strategy: MigrationStrategy,
        path: &Path,
        artifact: &ConfigArtifact,
        intents: &mut BTreeMap<PathBuf, MigrationAction>,
        risks: &mut Vec<Risk>,
    ) -> MigrateResult<()> {
        let action = match strategy.resolve(ArtifactKind::Custom, false) {
            ActionKind::Overwrite => match self.rules.stock_content(path) {
                Some(stock) => {
                    risks.push(Risk::new(
                        RiskKind::ReplacesCustom,
                        path.to_path_buf(),
                        "full strategy replaces this user-authored artifact with stock content",
                    ));
                    MigrationAction::overwrite(
                        path,
                        stock,
                        "replaced with stock current-scheme content",
                    )
                    .with_prior(artifact.kind, artifact.content_hash.clone())
                }
                None => skip_with_prior(path, "user-authored; no stock replacement defined", artifact),
            },
            _ => skip_with_prior(path, "user-authored artifact preserved", artifact),
        };
        push_intent(intents, action)
    }

    fn plan_legacy(
        &self,
        strategy: MigrationStrategy,
        path: &Path,
        s: &ScannedArtifact,
        scanned: &BTreeMap<PathBuf, ScannedArtifact>,
        intents: &mut BTreeMap<PathBuf, MigrationAction>,
        risks: &mut Vec<Risk>,
    ) -> MigrateResult<()> {
        let artifact = &s.artifact;
        let target = self
            .rules
            .target_for(path)
            .unwrap_or_else(|| path.to_path_buf());

        if target != *path {
            if let Some(occupant) = scanned.get(&target) {
                return self.plan_legacy_with_occupant(
                    strategy, path, s, &target, occupant, intents, risks,
                );
            }
        }

        let counterpart = self.counterpart_of(path, scanned);
        let has_counterpart = counterpart.is_some();

        match strategy.resolve(ArtifactKind::Legacy, has_counterpart) {
            ActionKind::Create => match self.rules.render_current(path, &s.content) {
                Some(rendered) => {
                    if target != *path {
                        push_intent(
                            intents,
                            MigrationAction::create(
                                &target,
                                rendered,
                                "converted from legacy original",
                            ),
                        )?;
                        push_intent(
                            intents,
                            MigrationAction::delete(
                                path,
                                format!("relocated to {}", target.display()),
                            )
                            .with_prior(artifact.kind, artifact.content_hash.clone()),
                        )?;
                    } else {
                        // The legacy file itself is rewritten, so this is
                        // an overwrite rather than a create
                        push_intent(
                            intents,
                            MigrationAction::overwrite(
                                path,
                                rendered,
                                "upgraded in place to the current scheme",
                            )
                            .with_prior(artifact.kind, artifact.content_hash.clone()),
                        )?;
                    }
                }
                None => push_intent(
                    intents,
                    skip_with_prior(path, "no conversion available for this content", artifact),
                )?,
            },
            ActionKind::Merge => {
                // resolve only yields Merge when a counterpart exists
                let merged = counterpart.and_then(|cp| {
                    self.rules.merge(path, &s.content, &cp.content)
                });
                match merged {
                    Some(content) => {
                        if target != *path {
                            push_intent(
                                intents,
                                MigrationAction::merge(
                                    &target,
                                    content,
                                    "combined legacy content with user customizations",
                                ),
                            )?;
                            push_intent(
                                intents,
                                MigrationAction::delete(
                                    path,
                                    format!("merged into {}", target.display()),
                                )
                                .with_prior(artifact.kind, artifact.content_hash.clone()),
                            )?;
                        } else {
                            push_intent(
                                intents,
                                MigrationAction::merge(
                                    path,
                                    content,
                                    "combined legacy content with user customizations",
                                )
                                .with_prior(artifact.kind, artifact.content_hash.clone()),
                            )?;
                        }
                    }
                    None => push_intent(
                        intents,
                        skip_with_prior(
                            path,
                            "no merge rule declared; custom counterpart preserved",
                            artifact,
                        ),
                    )?,
                }
            }
            _ => {
                let reason = match counterpart {
                    Some(cp) => format!(
                        "custom counterpart {} exists; preserved",
                        cp.artifact.path.display()
                    ),
                    None => "preserved".to_string(),
                };
                push_intent(intents, skip_with_prior(path, reason, artifact))?;
            }
        }

        Ok(())
    }

    /// A relocating legacy artifact whose destination is already occupied
    fn plan_legacy_with_occupant(
        &self,
        strategy: MigrationStrategy,
        path: &Path,
        s: &ScannedArtifact,
        target: &Path,
        occupant: &ScannedArtifact,
        intents: &mut BTreeMap<PathBuf, MigrationAction>,
        risks: &mut Vec<Risk>,
    ) -> MigrateResult<()> {
        let artifact = &s.artifact;
        match occupant.artifact.kind {
            ArtifactKind::Current => match strategy {
                MigrationStrategy::Selective => push_intent(
                    intents,
                    skip_with_prior(
                        path,
                        format!("superseded by current-format {}", target.display()),
                        artifact,
                    ),
                ),
                MigrationStrategy::Full => push_intent(
                    intents,
                    MigrationAction::delete(
                        path,
                        format!("legacy original superseded by {}", target.display()),
                    )
                    .with_prior(artifact.kind, artifact.content_hash.clone()),
                ),
                MigrationStrategy::Merge => {
                    match self.rules.merge(path, &s.content, &occupant.content) {
                        Some(content) => {
                            push_intent(
                                intents,
                                MigrationAction::merge(
                                    target,
                                    content,
                                    "combined legacy and current content",
                                )
                                .with_prior(
                                    occupant.artifact.kind,
                                    occupant.artifact.content_hash.clone(),
                                ),
                            )?;
                            push_intent(
                                intents,
                                MigrationAction::delete(
                                    path,
                                    format!("merged into {}", target.display()),
                                )
                                .with_prior(artifact.kind, artifact.content_hash.clone()),
                            )
                        }
                        None => push_intent(
                            intents,
                            skip_with_prior(
                                path,
                                "no merge rule declared; target already current",
                                artifact,
                            ),
                        ),
                    }
                }
            },
            ArtifactKind::Custom => match strategy {
                MigrationStrategy::Selective => push_intent(
                    intents,
                    skip_with_prior(
                        path,
                        format!("user content at {} preserved", target.display()),
                        artifact,
                    ),
                ),
                MigrationStrategy::Full => match self.rules.render_current(path, &s.content) {
                    Some(rendered) => {
                        risks.push(Risk::new(
                            RiskKind::ReplacesCustom,
                            target.to_path_buf(),
                            "full strategy replaces this user-authored artifact with converted legacy content",
                        ));
                        push_intent(
                            intents,
                            MigrationAction::create(
                                target,
                                rendered,
                                "converted from legacy original",
                            )
                            .with_prior(
                                occupant.artifact.kind,
                                occupant.artifact.content_hash.clone(),
                            ),
                        )?;
                        push_intent(
                            intents,
                            MigrationAction::delete(
                                path,
                                format!("relocated to {}", target.display()),
                            )
                            .with_prior(artifact.kind, artifact.content_hash.clone()),
                        )
                    }
                    None => push_intent(
                        intents,
                        skip_with_prior(path, "no conversion available for this content", artifact),
                    ),
                },
                MigrationStrategy::Merge => {
                    match self.rules.merge(path, &s.content, &occupant.content) {
                        Some(content) => {
                            push_intent(
                                intents,
                                MigrationAction::merge(
                                    target,
                                    content,
                                    "combined legacy content with user customizations",
                                )
                                .with_prior(
                                    occupant.artifact.kind,
                                    occupant.artifact.content_hash.clone(),
                                ),
                            )?;
                            push_intent(
                                intents,
                                MigrationAction::delete(
                                    path,
                                    format!("merged into {}", target.display()),
                                )
                                .with_prior(artifact.kind, artifact.content_hash.clone()),
                            )
                        }
                        None => push_intent(
                            intents,
                            skip_with_prior(
                                path,
                                "no merge rule declared; user content preserved",
                                artifact,
                            ),
                        ),
                    }
                }
            },
            // The occupant is itself legacy (it gets its own in-place
            // upgrade) or unrecognized; never write over it from here
            ArtifactKind::Legacy | ArtifactKind::Unknown => match strategy {
                MigrationStrategy::Full => push_intent(
                    intents,
                    MigrationAction::delete(
                        path,
                        format!("legacy original superseded by {}", target.display()),
                    )
                    .with_prior(artifact.kind, artifact.content_hash.clone()),
                ),
                _ => push_intent(
                    intents,
                    skip_with_prior(
                        path,
                        format!("target {} holds content pending its own migration", target.display()),
                        artifact,
                    ),
                ),
            },
        }
    }

    /// The slot's custom counterpart, if one was scanned and classifies custom
    fn counterpart_of<'s>(
        &self,
        path: &Path,
        scanned: &'s BTreeMap<PathBuf, ScannedArtifact>,
    ) -> Option<&'s ScannedArtifact> {
        let cp = self.rules.custom_counterpart(path)?;
        scanned
            .get(&cp)
            .filter(|s| s.artifact.kind == ArtifactKind::Custom)
    }
}

fn skip_with_prior(
    path: &Path,
    reason: impl Into<String>,
    artifact: &ConfigArtifact,
) -> MigrationAction {
    MigrationAction::skip(path, reason).with_prior(artifact.kind, artifact.content_hash.clone())
}

/// Combine intents landing on the same path; a more specific action wins,
/// and two equally specific but different intents are an internal fault
fn push_intent(
    intents: &mut BTreeMap<PathBuf, MigrationAction>,
    action: MigrationAction,
) -> MigrateResult<()> {
    match intents.entry(action.target.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(action);
        }
        Entry::Occupied(mut slot) => {
            let existing = slot.get();
            let held = intent_rank(existing.kind);
            let offered = intent_rank(action.kind);
            if offered > held {
                slot.insert(action);
            } else if offered == held
                && (existing.kind != action.kind || existing.content != action.content)
            {
                return Err(MigrateError::PlanConflict(format!(
                    "conflicting {} and {} actions for {}",
                    existing.kind,
                    action.kind,
                    action.target.display()
                )));
            }
        }
    }
    Ok(())
}

fn intent_rank(kind: ActionKind) -> u8 {
    match kind {
        ActionKind::Skip => 0,
        ActionKind::Delete => 1,
        ActionKind::Overwrite => 2,
        ActionKind::Create => 3,
        ActionKind::Merge => 4,
    }
}
