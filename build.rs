use shadow_rs::ShadowBuilder;

fn main() {
    // Version metadata for `--version` and `/health`
    ShadowBuilder::builder()
        .build()
        .expect("Failed to generate build metadata");
}
