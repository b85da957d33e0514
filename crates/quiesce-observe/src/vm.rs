//! Virtual machine observations.

use quiesce_core::{PowerState, VmSelector};
use quiesce_transport::HypervisorApi;
use regex::Regex;

use crate::error::{classify, ObserveError};

/// Power state of one VM, by inventory name.
///
/// # Errors
///
/// Returns [`ObserveError::NotFound`] when the VM does not exist and
/// [`ObserveError::UnexpectedState`] when the backend reports a power state
/// outside the known domain.
pub async fn vm_power_state(
    api: &dyn HypervisorApi,
    vm: &str,
) -> Result<PowerState, ObserveError> {
    let raw = api
        .vm_power_state(vm)
        .await
        .map_err(|err| classify(vm, err))?;
    PowerState::from_api(&raw).ok_or_else(|| ObserveError::UnexpectedState {
        target: vm.to_string(),
        field: "power_state",
        raw,
    })
}

/// Power states of every VM whose name matches the selector.
///
/// The match set is ordered as the inventory reports it. An empty result is
/// valid: a defaulted selector over an empty inventory, or an explicit
/// pattern that matched nothing. The inventory itself being missing is an
/// error.
///
/// # Errors
///
/// Returns [`ObserveError::InvalidPattern`] when an explicit pattern does
/// not compile, [`ObserveError::NotFound`] when the inventory listing itself
/// is missing, and [`ObserveError::UnexpectedState`] for out-of-domain power
/// states.
pub async fn vms_matching(
    api: &dyn HypervisorApi,
    selector: &VmSelector,
) -> Result<Vec<(String, PowerState)>, ObserveError> {
    let pattern = match selector.pattern() {
        Some(p) => Some(Regex::new(p).map_err(|err| ObserveError::InvalidPattern {
            pattern: p.to_string(),
            reason: err.to_string(),
        })?),
        None => None,
    };

    let vms = api
        .list_vms(None)
        .await
        .map_err(|err| classify("vm inventory", err))?;

    let mut matched = Vec::new();
    for summary in vms {
        if let Some(pattern) = &pattern {
            if !pattern.is_match(&summary.name) {
                continue;
            }
        }
        let state =
            PowerState::from_api(&summary.power_state).ok_or_else(|| {
                ObserveError::UnexpectedState {
                    target: summary.name.clone(),
                    field: "power_state",
                    raw: summary.power_state.clone(),
                }
            })?;
        matched.push((summary.name, state));
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeHypervisor;

    #[tokio::test]
    async fn single_vm_state_maps() {
        let api = FakeHypervisor::with_vms(&[("mgmt-vc01", "POWERED_ON")]);
        let state = vm_power_state(&api, "mgmt-vc01").await.unwrap();
        assert_eq!(state, PowerState::PoweredOn);
    }

    #[tokio::test]
    async fn missing_vm_is_not_found() {
        let api = FakeHypervisor::default();
        let err = vm_power_state(&api, "ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn out_of_domain_power_state_is_flagged() {
        let api = FakeHypervisor::with_vms(&[("mgmt-vc01", "HIBERNATED")]);
        let err = vm_power_state(&api, "mgmt-vc01").await.unwrap_err();
        assert!(matches!(
            err,
            ObserveError::UnexpectedState { field: "power_state", .. }
        ));
    }

    #[tokio::test]
    async fn pattern_filters_inventory() {
        let api = FakeHypervisor::with_vms(&[
            ("mgmt-vc01", "POWERED_ON"),
            ("mgmt-nsx01", "POWERED_ON"),
            ("tenant-db02", "POWERED_OFF"),
        ]);

        let matched = vms_matching(&api, &VmSelector::Pattern("^mgmt-".into()))
            .await
            .unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].0, "mgmt-vc01");

        let all = vms_matching(&api, &VmSelector::Defaulted).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn zero_matches_is_empty_not_error() {
        let api = FakeHypervisor::with_vms(&[("tenant-db02", "POWERED_OFF")]);
        let matched = vms_matching(&api, &VmSelector::Pattern("^mgmt-".into()))
            .await
            .unwrap();
        assert!(matched.is_empty());
    }

    #[tokio::test]
    async fn missing_inventory_is_distinct_from_zero_matches() {
        let api = FakeHypervisor {
            inventory_missing: true,
            ..FakeHypervisor::default()
        };
        let err = vms_matching(&api, &VmSelector::Defaulted).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn invalid_pattern_is_reported() {
        let api = FakeHypervisor::default();
        let err = vms_matching(&api, &VmSelector::Pattern("(unclosed".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ObserveError::InvalidPattern { .. }));
    }
}
