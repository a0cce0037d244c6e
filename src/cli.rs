use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use faceapi::utils::ResultFormatter;
use faceapi::face::{FaceResponse, SimilarParameter};
use faceapi::{ClientConfig, ConfigLoader, ConfigOverrides, DetectParameters, Face, FaceAttribute};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API key，优先于 FACE_API_KEY 和配置文件
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// 服务地址，例如 https://westus.api.cognitive.microsoft.com/face/v1.0
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// 指定配置文件（默认查找 faceapi.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 输出原始 JSON
    #[arg(long, global = true)]
    pub raw: bool,

    /// 关闭彩色输出
    #[arg(long, global = true)]
    pub no_color: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect faces in an image
    Detect(DetectArgs),
    /// Find similar faces from a face id list or a face list
    Similar {
        #[arg(long)]
        face_id: String,
        /// 逗号分隔的候选 faceId
        #[arg(long, value_delimiter = ',', conflicts_with = "list_id", required_unless_present = "list_id")]
        face_ids: Vec<String>,
        #[arg(long)]
        list_id: Option<String>,
        #[arg(long, default_value_t = 20)]
        max: u32,
    },
    /// Divide faces into groups of the same person
    Group {
        #[arg(long, value_delimiter = ',', required = true)]
        face_ids: Vec<String>,
    },
    /// Identify faces against a person group
    Identify {
        #[arg(long, value_delimiter = ',', required = true)]
        face_ids: Vec<String>,
        #[arg(long)]
        group: String,
        #[arg(long, default_value_t = 1)]
        max: u32,
    },
    /// Verify whether two faces belong to the same person
    Verify { face1: String, face2: String },
}

#[derive(Args)]
pub struct DetectArgs {
    #[command(flatten)]
    pub source: ImageSource,
    #[arg(long)]
    pub landmarks: bool,
    /// 逗号分隔: age,gender,headPose,smile,facialHair,glasses
    #[arg(long, value_delimiter = ',')]
    pub attributes: Vec<FaceAttribute>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ImageSource {
    /// 远程图片地址
    #[arg(long)]
    pub url: Option<String>,
    /// 本地图片文件
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_key: self.key.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    /// 优先级: 命令行 > 环境变量 > 配置文件 > 默认值
    pub fn resolve_config(&self) -> Result<ClientConfig> {
        let file = match &self.config {
            Some(path) => Some(ConfigLoader::load_from_path(path)?),
            None => ConfigLoader::find_and_load(),
        };
        Ok(ClientConfig::resolve(file, &self.overrides()))
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let face = Face::with_config(&config).context("failed to create face client")?;
    let formatter = ResultFormatter::new(!cli.no_color);

    let output = match cli.command {
        Commands::Detect(args) => {
            let params = DetectParameters::default()
                .with_landmarks(args.landmarks)
                .with_attributes(&args.attributes);
            let body = match (args.source.url, args.source.file) {
                (Some(url), _) => face.detect_url_raw(&params, &url).await?,
                (None, Some(file)) => face.detect_file_raw(&params, &file).await?,
                (None, None) => anyhow::bail!("either --url or --file is required"),
            };
            if cli.raw {
                formatter.format_raw(&body)
            } else {
                let faces: FaceResponse = serde_json::from_slice(&body)?;
                formatter.format_faces(&faces)
            }
        }
        Commands::Similar {
            face_id,
            face_ids,
            list_id,
            max,
        } => {
            let option = match list_id {
                Some(list_id) => SimilarParameter::from_list_id(&face_id, &list_id, max),
                None => SimilarParameter::from_list(&face_id, &face_ids, max),
            };
            if cli.raw {
                formatter.format_raw(&face.find_similar_raw(&option).await?)
            } else {
                formatter.format_similar(&face.find_similar(&option).await?)
            }
        }
        Commands::Group { face_ids } => {
            if cli.raw {
                formatter.format_raw(&face.group_faces(&face_ids).await?)
            } else {
                formatter.format_group(&face.group(&face_ids).await?)
            }
        }
        Commands::Identify {
            face_ids,
            group,
            max,
        } => {
            if cli.raw {
                formatter.format_raw(&face.identify_faces(&face_ids, &group, max).await?)
            } else {
                formatter.format_identify(&face.identify(&face_ids, &group, max).await?)
            }
        }
        Commands::Verify { face1, face2 } => {
            if cli.raw {
                formatter.format_raw(&face.verify_with_face(&face1, &face2).await?)
            } else {
                formatter.format_verify(&face.verify(&face1, &face2).await?)
            }
        }
    };

    println!("{}", output);
    Ok(())
}
