fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Compile the recommender service definition shared with the ALS service
    tonic_build::compile_protos("../../proto/recommender.proto")?;
    Ok(())
}
