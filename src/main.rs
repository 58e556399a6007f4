// Copyright @yucwang 2026

use candela::core::accum::AccumBuffer;
use candela::core::scene::Scene;
use candela::core::settings::RenderSettings;
use candela::integrators::path::PathIntegrator;
use candela::io::exr_utils;
use candela::materials::lambertian::LambertianBSDF;
use candela::math::constants::{Float, Vector3f};
use candela::math::spectrum::RGBSpectrum;
use candela::renderers::progressive::{ProgressiveRenderer, Renderer};
use candela::sensors::perspective::PerspectiveCamera;
use candela::shapes::quad::Quad;
use candela::shapes::sphere::Sphere;

use std::env;
use std::sync::Arc;

fn build_demo_scene() -> Scene {
    let mut scene = Scene::new();
    scene.set_background(RGBSpectrum::new(0.02, 0.02, 0.03));

    let floor = scene.add_material(Arc::new(LambertianBSDF::new(
        RGBSpectrum::new(0.6, 0.6, 0.6),
    )));
    let red = scene.add_material(Arc::new(LambertianBSDF::new(
        RGBSpectrum::new(0.7, 0.2, 0.2),
    )));
    let white = scene.add_material(Arc::new(LambertianBSDF::new(
        RGBSpectrum::new(0.8, 0.8, 0.8),
    )));
    let lamp_frame = scene.add_material(Arc::new(LambertianBSDF::new(
        RGBSpectrum::default(),
    )));

    // Ground plane facing up.
    scene.add_object(
        Arc::new(Quad::new(
            Vector3f::new(-5.0, 0.0, -5.0),
            Vector3f::new(0.0, 0.0, 10.0),
            Vector3f::new(10.0, 0.0, 0.0),
        )),
        floor,
    );

    scene.add_object(Arc::new(Sphere::new(Vector3f::new(-1.2, 1.0, 0.0), 1.0)), red);
    scene.add_object(Arc::new(Sphere::new(Vector3f::new(1.2, 1.0, -0.6), 1.0)), white);

    // Overhead lamp facing down.
    scene.add_quad_light(
        Quad::new(
            Vector3f::new(-1.0, 4.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
        ),
        lamp_frame,
        RGBSpectrum::from_scalar(15.0),
    );

    scene
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <output.exr> [--env map.exr] [--env-scale S] [--spp N] \
             [--max-depth N] [--frames N] [--width N] [--height N] [--clamp L]",
            args[0]
        );
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut env_path: Option<String> = None;
    let mut env_scale: Float = 1.0;
    let mut settings = RenderSettings::default();
    let mut frames: u32 = 4;
    let mut width: usize = 512;
    let mut height: usize = 512;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--env" => {
                i += 1;
                env_path = args.get(i).cloned();
            }
            "--env-scale" => {
                i += 1;
                env_scale = args.get(i).and_then(|v| v.parse::<Float>().ok()).unwrap_or(1.0);
            }
            "--spp" => {
                i += 1;
                if let Some(v) = args.get(i).and_then(|v| v.parse::<u32>().ok()) {
                    settings.samples_per_pixel = v;
                }
            }
            "--max-depth" => {
                i += 1;
                if let Some(v) = args.get(i).and_then(|v| v.parse::<u32>().ok()) {
                    settings.max_depth = v;
                }
            }
            "--frames" => {
                i += 1;
                frames = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(4);
            }
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(512);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(512);
            }
            "--clamp" => {
                i += 1;
                settings.firefly_clamp = args.get(i).and_then(|v| v.parse::<Float>().ok());
            }
            _ => {}
        }
        i += 1;
    }

    let mut scene = build_demo_scene();
    if let Some(path) = env_path {
        scene.load_environment(&path, env_scale);
    }

    let camera = PerspectiveCamera::new(
        Vector3f::new(0.0, 2.5, 7.0),
        Vector3f::new(0.0, 1.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        45.0f32.to_radians(),
        width as Float / height as Float,
    );

    let firefly_clamp = settings.firefly_clamp;
    let integrator = Box::new(PathIntegrator::new(settings));
    let renderer = ProgressiveRenderer::new(integrator, firefly_clamp);

    let mut accum = AccumBuffer::new(width, height);
    for frame in 0..frames {
        log::info!("rendering frame {}/{}", frame + 1, frames);
        renderer.render_frame(&scene, &camera, &mut accum);
    }

    exr_utils::write_exr_to_file(&accum.color_image(), width, height, output_path);
}
