use std::{
    convert::TryInto,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    camera::{self, Camera},
    core::{loader::InputParams, scene::Scene},
    light::{self, Light},
    material::{self, Material},
    primitive::{self, Primitive},
    renderer::OutputConfig,
};

pub fn load_scene<P: AsRef<Path>>(path: P) -> anyhow::Result<(Scene, OutputConfig)> {
    let path = path.as_ref().to_path_buf();
    let json_value = read_json(&path, "scene")?;
    load_scene_from_value(&json_value, path)
}

/// parses a scene held in memory, relative file names resolve against `base_path`
#[cfg(test)]
pub fn load_scene_from_str(
    json: &str,
    base_path: PathBuf,
) -> anyhow::Result<(Scene, OutputConfig)> {
    let json_value: serde_json::Value =
        serde_json::from_str(json).context("scene - invalid json")?;
    load_scene_from_value(&json_value, base_path)
}

fn load_scene_from_value(
    json_value: &serde_json::Value,
    path: PathBuf,
) -> anyhow::Result<(Scene, OutputConfig)> {
    let output_value = json_value
        .get("output")
        .context("scene - There is no 'output' field")?;
    let mut output_params = to_params(output_value, &path)?;
    let config = OutputConfig::load(&mut output_params)?;

    let camera_value = json_value
        .get("camera")
        .context("scene - There is no 'camera' field")?;
    let mut camera_params = to_params(camera_value, &path)?;
    let camera: Camera = camera::create_camera_from_params(&mut camera_params, config.aspect())?;

    let mut materials: Vec<Material> = vec![];
    let material_value = json_value
        .get("materials")
        .context("scene - There is no 'materials' field")?;
    load_from_value_or_external(&path, material_value, "material", &mut |params| {
        materials.push(material::create_material_from_params(params)?);
        Ok(())
    })?;

    let mut primitives: Vec<Primitive> = vec![];
    let material_count = materials.len();
    let shape_value = json_value
        .get("shapes")
        .context("scene - There is no 'shapes' field")?;
    load_from_value_or_external(&path, shape_value, "shape", &mut |params| {
        primitive::create_primitives_from_params(params, material_count, &mut primitives)
    })?;

    let mut lights: Vec<Light> = vec![];
    if let Some(light_value) = json_value.get("lights") {
        load_from_value_or_external(&path, light_value, "light", &mut |params| {
            lights.push(light::create_light_from_params(params)?);
            Ok(())
        })?;
    }
    if lights.is_empty() {
        log::warn!("scene - there is no light, the image will be black");
    }

    log::info!(
        "scene loaded - {} materials, {} primitives, {} lights",
        materials.len(),
        primitives.len(),
        lights.len()
    );

    let scene = Scene::new(camera, primitives, materials, lights);
    Ok((scene, config))
}

fn read_json(path: &Path, env: &str) -> anyhow::Result<serde_json::Value> {
    let json_file = std::fs::File::open(path)
        .context(format!("{} - can't open '{}'", env, path.display()))?;
    let json_reader = std::io::BufReader::new(json_file);
    let json_value = serde_json::from_reader(json_reader)
        .context(format!("{} - '{}' is not valid json", env, path.display()))?;
    Ok(json_value)
}

fn to_params(value: &serde_json::Value, path: &Path) -> anyhow::Result<InputParams> {
    let mut params: InputParams = value.try_into()?;
    params.set_base_path(path.to_path_buf());
    Ok(params)
}

/// a record list is an array of records or the name of a json file holding that array
fn load_from_value_or_external<F: FnMut(&mut InputParams) -> anyhow::Result<()>>(
    path: &Path,
    value: &serde_json::Value,
    env: &str,
    load_func: &mut F,
) -> anyhow::Result<()> {
    if let Some(json_path) = value.as_str() {
        let external_path = path.with_file_name(json_path);
        let json_value = read_json(&external_path, env)?;
        if json_value.is_string() {
            anyhow::bail!(format!("{} - external file should hold records", env));
        }
        return load_from_value_or_external(&external_path, &json_value, env, load_func);
    }

    let array = value
        .as_array()
        .context(format!("{} - should be an array or a file name", env))?;
    for (index, ele) in array.iter().enumerate() {
        let mut params =
            to_params(ele, path).context(format!("{}[{}] - invalid record", env, index))?;
        params.set_name(format!("{}[{}]", env, index).into());
        load_func(&mut params)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{light::LightT, primitive::PrimitiveT};

    const SCENE: &str = r#"{
        "output": { "filename": "out.png", "width": 40, "height": 20, "spp": 4, "seed": 3 },
        "camera": { "type": "perspective", "position": [0, 1, 5], "fov": 45 },
        "materials": [
            { "type": "diffuse", "albedo": [0.8, 0.4, 0.3] },
            { "type": "conductor", "eta_to": [0.2, 3.0], "roughness_x": 0.2, "roughness_y": 0.2 },
            { "type": "dielectric", "eta_from": 1.0, "eta_to": 1.5 }
        ],
        "shapes": [
            { "type": "sphere", "center": [0, -80.98, -4], "radius": 80, "material": 0 },
            { "type": "sphere", "center": [0, 0, -4], "radius": 0.5, "material": 2 },
            { "type": "triangle", "p1": [0, 0, 0], "p2": [1, 0, 0], "p3": [0, 1, 0], "material": 1 }
        ],
        "lights": [
            { "type": "point", "position": [0, 5, 0], "color": [1, 1, 1], "power": 100 },
            { "type": "environment", "color": [0.1, 0.1, 0.2] }
        ]
    }"#;

    #[test]
    fn parses_a_complete_scene() {
        let (scene, config) =
            load_scene_from_str(SCENE, PathBuf::from("scenes/test.json")).unwrap();
        assert_eq!(config.width, 40);
        assert_eq!(config.height, 20);
        assert_eq!(config.spp, 4);
        assert_eq!(config.seed, 3);
        assert_eq!(config.tile_size, OutputConfig::DEFAULT_TILE_SIZE);
        assert_eq!(config.filename, PathBuf::from("scenes/out.png"));

        assert_eq!(scene.materials().len(), 3);
        assert_eq!(scene.bvh().primitives().len(), 3);
        assert_eq!(scene.bvh().primitive(2).material(), 1);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.environment_count(), 1);
        assert!(!scene.lights()[0].is_environment());
        let env = scene.environment_radiance(glam::Vec3A::Y);
        assert!((env.b - 0.2).abs() < 1e-6);
    }

    fn replace_record(from: &str, to: &str) -> String {
        assert!(SCENE.contains(from));
        SCENE.replace(from, to)
    }

    #[test]
    fn rejects_unknown_tags() {
        let scene = replace_record(r#""type": "diffuse""#, r#""type": "velvet""#);
        let err = load_scene_from_str(&scene, PathBuf::from("test.json")).err().unwrap();
        assert!(err.to_string().contains("material[0]-velvet"));

        let scene = replace_record(r#""type": "point""#, r#""type": "area""#);
        let err = load_scene_from_str(&scene, PathBuf::from("test.json")).err().unwrap();
        assert!(err.to_string().contains("unknown type 'area'"));

        let scene = replace_record(r#""type": "triangle""#, r#""type": "cube""#);
        assert!(load_scene_from_str(&scene, PathBuf::from("test.json")).is_err());
    }

    #[test]
    fn rejects_bad_records() {
        let scene = replace_record(r#""material": 1 }"#, r#""material": 3 }"#);
        let err = load_scene_from_str(&scene, PathBuf::from("test.json")).err().unwrap();
        assert!(err.to_string().contains("out of range"));

        let scene = replace_record(r#""p3": [0, 1, 0]"#, r#""p3": [2, 0, 0]"#);
        let err = load_scene_from_str(&scene, PathBuf::from("test.json")).err().unwrap();
        assert!(err.to_string().contains("zero area"));

        let scene = replace_record(r#""radius": 0.5"#, r#""radius": -0.5"#);
        assert!(load_scene_from_str(&scene, PathBuf::from("test.json")).is_err());

        let scene = replace_record(r#""width": 40"#, r#""width": "wide""#);
        assert!(load_scene_from_str(&scene, PathBuf::from("test.json")).is_err());

        assert!(load_scene_from_str("{", PathBuf::from("test.json")).is_err());
        assert!(load_scene("no/such/scene.json").is_err());
    }

    #[test]
    fn missing_mesh_file_is_reported() {
        let scene = replace_record(
            r#"{ "type": "triangle", "p1": [0, 0, 0], "p2": [1, 0, 0], "p3": [0, 1, 0], "material": 1 }"#,
            r#"{ "type": "mesh", "obj_file": "missing.obj", "material": 1 }"#,
        );
        let err = load_scene_from_str(&scene, PathBuf::from("test.json")).err().unwrap();
        assert!(err.to_string().contains("missing.obj"));
    }
}
