//! Renders the biome territory around a point to a PNG file.
//!
//! Builds a generator over a small built-in definition set, so the map
//! layer can be inspected without running a full game world.
//! Run with `cargo run -p veld-mapview -- --seed 42 -o map.png`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use glam::IVec2;
use tracing::{error, info};

use veld_voxel::{BlockCatalog, BlockDef, BlockId, Content, FluidCatalog, FluidDef};
use veld_worldgen::{
    BiomeDef, Boulder, CoverDef, DecorationRef, DistributionDef, DistributionEntry,
    GenerationSettings, Generator, GeneratorResources, LayerDef, LayerKindDef, MapImage,
    OffsetDef, Palette, PaletteEntry, SeedPair, StoneType, SubBiomeDef, Tuft, WeightedRef,
};

/// Map view exporter command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "veld-mapview", about = "Veld territory map exporter")]
struct CliArgs {
    /// World seed; detail seed is derived from it unless given.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Independent detail seed.
    #[arg(long)]
    detail_seed: Option<u64>,

    /// Center column X.
    #[arg(long, default_value_t = 0)]
    x: i32,

    /// Center column Z.
    #[arg(long, default_value_t = 0)]
    z: i32,

    /// Image width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Image height in pixels.
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Columns per pixel.
    #[arg(long, default_value_t = 4)]
    scale: u32,

    /// Generation settings file (RON); defaults apply when absent.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output PNG path.
    #[arg(short, long, default_value = "map.png")]
    output: PathBuf,

    /// Directory for a plain-text log file.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    veld_log::init_logging(args.log_dir.as_deref());

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "map view export failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = match &args.settings {
        Some(path) => GenerationSettings::load(path)?,
        None => GenerationSettings::default(),
    };
    let seeds = match args.detail_seed {
        Some(detail) => SeedPair::new(args.seed, detail),
        None => SeedPair::split(args.seed),
    };

    let generator = Generator::create(demo_resources()?, settings, seeds)
        .ok_or("generator could not be created from the built-in resources")?;

    let center = IVec2::new(args.x, args.z);
    info!(?center, width = args.width, height = args.height, scale = args.scale, "rendering map view");
    let image = MapImage::render(&generator, center, args.width, args.height, args.scale);
    image.save(&args.output)?;
    info!(path = %args.output.display(), "map view written");
    Ok(())
}

struct DemoBlocks {
    catalog: Arc<BlockCatalog>,
    stone: [BlockId; 4],
    gravel: [BlockId; 4],
    wet_gravel: [BlockId; 4],
    grass: BlockId,
    dirt: BlockId,
    sand: BlockId,
    wet_sand: BlockId,
    snow: BlockId,
    core: BlockId,
    tuft: BlockId,
}

fn demo_blocks() -> Result<DemoBlocks, Box<dyn std::error::Error>> {
    let mut catalog = BlockCatalog::new();
    let solid = |catalog: &mut BlockCatalog, name: &str| {
        catalog.register(BlockDef {
            name: name.into(),
            solid: true,
            fillable: false,
        })
    };

    let mut stone = [BlockId::AIR; 4];
    let mut gravel = [BlockId::AIR; 4];
    let mut wet_gravel = [BlockId::AIR; 4];
    for (i, code) in ["sandstone", "limestone", "granite", "marble"]
        .into_iter()
        .enumerate()
    {
        stone[i] = solid(&mut catalog, code)?;
        gravel[i] = solid(&mut catalog, &format!("{code}_gravel"))?;
        wet_gravel[i] = solid(&mut catalog, &format!("{code}_gravel_wet"))?;
    }
    let grass = solid(&mut catalog, "grass")?;
    let dirt = solid(&mut catalog, "dirt")?;
    let sand = solid(&mut catalog, "sand")?;
    let wet_sand = solid(&mut catalog, "wet_sand")?;
    let snow = solid(&mut catalog, "snow")?;
    let core = solid(&mut catalog, "core")?;
    let tuft = catalog.register(BlockDef {
        name: "grass_tuft".into(),
        solid: false,
        fillable: true,
    })?;

    Ok(DemoBlocks {
        catalog: Arc::new(catalog),
        stone,
        gravel,
        wet_gravel,
        grass,
        dirt,
        sand,
        wet_sand,
        snow,
        core,
        tuft,
    })
}

fn demo_resources() -> Result<GeneratorResources, Box<dyn std::error::Error>> {
    let blocks = demo_blocks()?;
    let mut fluids = FluidCatalog::new();
    let water = fluids.register(FluidDef {
        name: "water".into(),
    })?;

    let entries: [PaletteEntry; 4] = std::array::from_fn(|i| PaletteEntry {
        stone: Content::block(blocks.stone[i]),
        loose: Content::block(blocks.gravel[i]),
        saturated: Content::block(blocks.wet_gravel[i]),
    });
    let palette = Palette::new(entries, Content::block(blocks.core), water);

    let grass_layers = vec![
        LayerDef {
            width: 1,
            kind: LayerKindDef::Top {
                dry: blocks.grass,
                wet: blocks.dirt,
            },
            dampenable: false,
        },
        LayerDef {
            width: 3,
            kind: LayerKindDef::Permeable {
                dry: blocks.dirt,
                wet: blocks.dirt,
            },
            dampenable: true,
        },
        LayerDef {
            width: 5,
            kind: LayerKindDef::Stone,
            dampenable: false,
        },
    ];
    let sand_layers = vec![
        LayerDef {
            width: 1,
            kind: LayerKindDef::Top {
                dry: blocks.sand,
                wet: blocks.wet_sand,
            },
            dampenable: false,
        },
        LayerDef {
            width: 4,
            kind: LayerKindDef::Loose,
            dampenable: true,
        },
        LayerDef {
            width: 3,
            kind: LayerKindDef::Stone,
            dampenable: false,
        },
    ];

    let sub_biomes = vec![
        SubBiomeDef {
            name: "meadow".into(),
            cover: CoverDef {
                dry: blocks.grass,
                wet: blocks.dirt,
                frosted: Some(blocks.snow),
            },
            layers: grass_layers.clone(),
            offset: OffsetDef {
                amplitude: 5.0,
                base_frequency: 0.012,
                octaves: 3,
            },
            blends: true,
            stuffer: None,
            oceanic: Some("shelf".into()),
            structure: Some("cairn".into()),
            decorations: vec![
                DecorationRef {
                    name: "grass_tuft".into(),
                    rarity: 0.02,
                },
                DecorationRef {
                    name: "boulder".into(),
                    rarity: 0.001,
                },
            ],
        },
        SubBiomeDef {
            name: "highland".into(),
            cover: CoverDef {
                dry: blocks.grass,
                wet: blocks.dirt,
                frosted: Some(blocks.snow),
            },
            layers: grass_layers,
            offset: OffsetDef {
                amplitude: 18.0,
                base_frequency: 0.006,
                octaves: 4,
            },
            blends: true,
            stuffer: None,
            oceanic: Some("shelf".into()),
            structure: None,
            decorations: vec![DecorationRef {
                name: "boulder".into(),
                rarity: 0.004,
            }],
        },
        SubBiomeDef {
            name: "dune".into(),
            cover: CoverDef {
                dry: blocks.sand,
                wet: blocks.wet_sand,
                frosted: None,
            },
            layers: sand_layers.clone(),
            offset: OffsetDef {
                amplitude: 7.0,
                base_frequency: 0.02,
                octaves: 2,
            },
            blends: true,
            stuffer: Some(blocks.sand),
            oceanic: Some("shelf".into()),
            structure: None,
            decorations: Vec::new(),
        },
        SubBiomeDef {
            name: "shelf".into(),
            cover: CoverDef {
                dry: blocks.sand,
                wet: blocks.wet_sand,
                frosted: None,
            },
            layers: sand_layers,
            offset: OffsetDef {
                amplitude: 3.0,
                base_frequency: 0.01,
                octaves: 2,
            },
            blends: true,
            stuffer: None,
            oceanic: None,
            structure: None,
            decorations: Vec::new(),
        },
        SubBiomeDef {
            name: "crag".into(),
            cover: CoverDef {
                dry: blocks.dirt,
                wet: blocks.dirt,
                frosted: Some(blocks.snow),
            },
            layers: vec![
                LayerDef {
                    width: 1,
                    kind: LayerKindDef::Loose,
                    dampenable: true,
                },
                LayerDef {
                    width: 6,
                    kind: LayerKindDef::Stone,
                    dampenable: false,
                },
            ],
            offset: OffsetDef {
                amplitude: 30.0,
                base_frequency: 0.004,
                octaves: 5,
            },
            // Steep terrain keeps its own offset; blending it against flat
            // neighbors flattens the cliffs it exists for.
            blends: false,
            stuffer: None,
            oceanic: None,
            structure: None,
            decorations: Vec::new(),
        },
    ];

    let biomes = vec![
        BiomeDef {
            name: "grassland".into(),
            sub_biomes: vec![
                WeightedRef {
                    name: "meadow".into(),
                    weight: 3,
                },
                WeightedRef {
                    name: "highland".into(),
                    weight: 1,
                },
            ],
        },
        BiomeDef {
            name: "desert".into(),
            sub_biomes: vec![WeightedRef {
                name: "dune".into(),
                weight: 1,
            }],
        },
        BiomeDef {
            name: "badlands".into(),
            sub_biomes: vec![WeightedRef {
                name: "crag".into(),
                weight: 1,
            }],
        },
    ];
    let distribution = DistributionDef {
        entries: vec![
            DistributionEntry {
                biome: "grassland".into(),
                weight: 5,
            },
            DistributionEntry {
                biome: "desert".into(),
                weight: 2,
            },
            DistributionEntry {
                biome: "badlands".into(),
                weight: 1,
            },
        ],
    };

    let cairn = {
        let marble = Content::block(blocks.stone[3]);
        let mut placements = Vec::new();
        for (y, half) in [(0, 2), (1, 1), (2, 0)] {
            for x in -half..=half {
                for z in -half..=half {
                    placements.push((glam::IVec3::new(x + 2, y, z + 2), marble));
                }
            }
        }
        veld_worldgen::Structure::new("cairn", placements)
    };

    Ok(GeneratorResources {
        blocks: blocks.catalog,
        palette: Some(palette),
        distribution: Some(distribution),
        biomes,
        sub_biomes,
        structures: vec![Arc::new(cairn)],
        decorations: vec![
            Arc::new(Tuft::new("grass_tuft", Content::block(blocks.tuft))),
            Arc::new(Boulder::new("boulder", 2, StoneType::from_code("granite")?)),
        ],
    })
}
