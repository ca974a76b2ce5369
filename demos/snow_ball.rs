use mpmkit::{
    resolve_asset_ids, Config, HasAssetId, LevelSet3D, LogFile, Registry, Texture, Vector3f,
    Vector3i, VolumeMaterial,
};

const GRID_DOWNSAMPLE: i32 = 2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== mpmkit - Snow Ball Setup ===\n");

    let log = LogFile::new(None, true)?;
    let mut registry = Registry::new().with_log(log.clone());
    println!("✓ Logging to {}", log.path().display());

    // ========================================
    // 1. Boundary
    // ========================================
    println!("\n--- 1. Boundary ---");

    let res = Vector3i::splat(256 / GRID_DOWNSAMPLE);
    let mut boundary = LevelSet3D::new(&mut registry, res)?;
    boundary.add_cuboid_with_inside_out([0.05, 0.05, 0.05], [0.95, 0.95, 0.95], true);
    boundary.add_plane(0.0, 1.0, 0.0, -0.1);
    boundary.set_friction(0.2);
    println!(
        "✓ Container at {} cells, dx = {}",
        res,
        boundary.get_delta_x()
    );

    // ========================================
    // 2. Assets
    // ========================================
    println!("\n--- 2. Assets ---");

    let mut ball = Texture::new(
        "sphere",
        Config::new()
            .set("center", Vector3f::new(0.5, 0.6, 0.5))
            .set("radius", 0.05f32),
    );
    registry.register_texture(&mut ball)?;
    let mut density = ball.scaled(10.0)?;
    registry.register_texture(&mut density)?;

    let mut snow = VolumeMaterial::new(
        "snow",
        Config::new()
            .set("hardening", 10.0f32)
            .set("youngs_modulus", 1.4e5f32),
    );
    registry.register_volume_material(&mut snow)?;
    println!("✓ Registered {} textures", registry.texture_count());

    // ========================================
    // 3. Particle config
    // ========================================
    println!("\n--- 3. Particle Config ---");

    let particles = Config::new()
        .set("density_tex", density.asset_ref())
        .set("material", snow.asset_ref())
        .set("levelset", boundary.asset_ref())
        .set("initial_velocity", Vector3f::new(0.0, -10.0, 0.0))
        .set("compression", 1.0f32)
        .set("delta_x", boundary.get_delta_x());
    let resolved = resolve_asset_ids(particles)?;
    log.log_config(&resolved)?;
    println!("✓ {}", resolved.describe().replace('\n', "\n  "));

    println!("\n=== Setup complete ===");
    Ok(())
}
