fn main() {
    let mut config = tonic_prost_build::Config::new();

    // Records are relayed to clients as JSON, so the generated message
    // types carry serde derives alongside the prost ones.
    config.type_attribute(".txfeed", "#[derive(serde::Serialize, serde::Deserialize)]");

    tonic_prost_build::configure()
        .compile_with_config(config, &["proto/txfeed.proto"], &["proto"])
        .unwrap();
}
