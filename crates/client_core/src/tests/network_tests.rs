use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn manifest_with_actions(address: &str) -> Manifest {
    Manifest {
        contracts: vec![
            ManifestContract {
                tag: "untitled-other".to_string(),
                address: "0xdead".to_string(),
            },
            ManifestContract {
                tag: ACTIONS_CONTRACT_TAG.to_string(),
                address: address.to_string(),
            },
        ],
    }
}

#[test]
fn katana_uses_local_defaults_without_policies() {
    let config = NetworkDefinition::with_env(ChainId::Katana, |_| None)
        .into_config(manifest_with_actions("0x123"));

    assert_eq!(config.rpc_url, "http://localhost:5050");
    assert_eq!(config.torii_url, "http://localhost:8080");
    assert_eq!(config.namespace, "untitled");
    assert_eq!(config.preset, "untitled");
    assert_eq!(config.slot.as_deref(), Some("untitled"));
    assert_eq!(config.policies, None);
    assert_eq!(
        config.chains,
        vec![ChainEndpoint {
            rpc_url: "http://localhost:5050".to_string()
        }]
    );
}

#[test]
fn katana_endpoints_follow_env_overrides() {
    let definition = NetworkDefinition::with_env(ChainId::Katana, |key| match key {
        "KATANA_RPC_URL" => Some("http://10.0.0.2:5050".to_string()),
        "KATANA_TORII_URL" => Some("  ".to_string()),
        _ => None,
    });
    assert_eq!(definition.rpc_url, "http://10.0.0.2:5050");
    assert_eq!(definition.torii_url, "http://localhost:8080");
}

#[test]
fn sepolia_policies_target_actions_contract() {
    let config = NetworkDefinition::with_env(ChainId::SnSepolia, |_| None)
        .into_config(manifest_with_actions("0xabc"));

    assert_eq!(
        config.rpc_url,
        "https://api.cartridge.gg/x/starknet/sepolia/rpc/v0_9"
    );
    assert_eq!(config.torii_url, "https://api.cartridge.gg/x/untitled/torii");
    let policies = config.policies.expect("sepolia policies");
    assert_eq!(
        policies,
        vec![
            Policy {
                target: "0xabc".to_string(),
                method: "spawn".to_string(),
            },
            Policy {
                target: "0xabc".to_string(),
                method: "move".to_string(),
            },
        ]
    );
}

#[test]
fn sepolia_policies_fall_back_to_empty_target() {
    let config =
        NetworkDefinition::with_env(ChainId::SnSepolia, |_| None).into_config(Manifest::default());
    let policies = config.policies.expect("sepolia policies");
    assert!(policies.iter().all(|policy| policy.target.is_empty()));
}

#[test]
fn unknown_network_is_rejected() {
    let err = get_network_config("MAINNET", Manifest::default()).expect_err("unknown");
    assert_eq!(err.to_string(), "Network MAINNET not found");
}

#[test]
fn chain_ids_parse_case_insensitively() {
    assert_eq!("katana".parse::<ChainId>().expect("katana"), ChainId::Katana);
    assert_eq!(
        "SN_SEPOLIA".parse::<ChainId>().expect("sepolia"),
        ChainId::SnSepolia
    );
}

#[test]
fn string_to_felt_encodes_short_strings() {
    assert_eq!(string_to_felt("").expect("empty"), "0x0");
    assert_eq!(string_to_felt("untitled").expect("felt"), "0x756e7469746c6564");
    assert!(matches!(
        string_to_felt("héllo"),
        Err(NetworkError::NonAsciiShortString(_))
    ));
    assert!(matches!(
        string_to_felt(&"a".repeat(32)),
        Err(NetworkError::ShortStringTooLong(_))
    ));
}

#[test]
fn loads_manifest_contracts_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("hexgrid_manifest_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join(ChainId::Katana.manifest_file());
    fs::write(
        &path,
        r#"{
            "world": {"address": "0x1"},
            "contracts": [{"tag": "untitled-actions", "address": "0x77", "abi": []}]
        }"#,
    )
    .expect("write manifest");

    let manifest = Manifest::load(&path).expect("manifest");
    assert_eq!(manifest.contract_address(ACTIONS_CONTRACT_TAG), Some("0x77"));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_manifest_reports_path() {
    let err = Manifest::load(Path::new("/definitely/not/here.json")).expect_err("missing");
    assert!(err.to_string().contains("/definitely/not/here.json"));
}
