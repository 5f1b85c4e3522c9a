//! Protocol version compatibility across every module.

use super::{Check, CheckError, Verdict};
use crate::state::StateSet;
use lsrd_types::{ModuleKind, VersionInfo};

/// Compatibility rule: the suite interoperates iff every module's
/// `lowest_supported` protocol version is less than or equal to the lowest
/// `version` actually running anywhere. A module that demands more than the
/// slowest peer provides is named together with that peer.
pub struct VersionCompatibility;

impl Check for VersionCompatibility {
    fn id(&self) -> &'static str {
        "version-compatibility"
    }

    fn required_modules(&self) -> &'static [ModuleKind] {
        &ModuleKind::ALL
    }

    fn evaluate(&self, states: &StateSet) -> Result<Verdict, CheckError> {
        let mut versions: Vec<(ModuleKind, &VersionInfo)> = Vec::new();
        for &module in &ModuleKind::ALL {
            let snapshot = states.snapshot(module).ok_or_else(|| {
                CheckError::malformed(module, "snapshot absent despite Ok fetch status")
            })?;
            versions.push((module, snapshot.version()));
        }

        for (module, info) in &versions {
            if info.lowest_supported > info.version {
                return Err(CheckError::malformed(
                    *module,
                    format!(
                        "lowest supported protocol {} exceeds running protocol {}",
                        info.lowest_supported, info.version
                    ),
                ));
            }
        }

        // `versions` follows ModuleKind::ALL, so min_by_key picks the first
        // slowest module deterministically.
        let (oldest_module, oldest) = versions
            .iter()
            .min_by_key(|(_, info)| info.version)
            .copied()
            .ok_or_else(|| {
                CheckError::malformed(ModuleKind::Discovery, "no module versions collected")
            })?;

        let mut findings = Vec::new();
        for (module, info) in &versions {
            if info.lowest_supported > oldest.version {
                findings.push(format!(
                    "{} (version {}, lowest supported {}) cannot interoperate with {} (version {})",
                    module, info.version, info.lowest_supported, oldest_module, oldest.version
                ));
            }
        }

        Ok(Verdict::from_findings(
            findings,
            format!(
                "all modules compatible, protocol versions {}..={}",
                oldest.version,
                versions
                    .iter()
                    .map(|(_, info)| info.version)
                    .max()
                    .unwrap_or(oldest.version)
            ),
        ))
    }
}
