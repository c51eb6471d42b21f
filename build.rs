fn main() -> Result<(), Box<dyn std::error::Error>> {
    // prost-build shells out to protoc; point it at the vendored binary so the
    // build does not require a system-wide install.
    if std::env::var_os("PROTOC").is_none() {
        std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    }

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/event_service.proto"], &["proto"])?;

    Ok(())
}
