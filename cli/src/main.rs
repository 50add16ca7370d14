use std::path::PathBuf;

use canvas::color::{Rgb, Rgba};
use canvas::doc::{ItemId, ItemPatch, TextAlign};
use canvas::editor::CaptionStyle;
use canvas::geom::BoardSize;
use canvas::upload::mime_from_file_name;
use clap::{Args, Parser, Subcommand};
use client::net::api::{ApiError, BoardBackend, VisionBoardApi};
use client::state::board::BoardSession;
use serde::Serialize;


#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing member id; pass --member-id or set VISION_MEMBER_ID")]
    MissingMemberId,
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("could not read {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("cannot tell the image type of {0}; pass --mime")]
    UnknownImageType(String),
    #[error("invalid color `{0}`")]
    InvalidColor(String),
    #[error("invalid alignment `{0}`; expected left, center or right")]
    InvalidAlign(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("nothing to update")]
    EmptyUpdate,
}

#[derive(Parser, Debug)]
#[command(name = "vision-cli", about = "Vision board REST API CLI")]
struct Cli {
    #[arg(long, env = "VISION_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "VISION_MEMBER_ID")]
    member_id: Option<String>,

    #[arg(long, env = "VISION_TEAM_ID")]
    team_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    /// List the member's items, bottom of the stack first.
    List,
    /// Upload an image as a new item at a random spot on the board.
    Upload {
        path: PathBuf,
        #[arg(long, help = "MIME type; guessed from the file extension when omitted")]
        mime: Option<String>,
        #[command(flatten)]
        board: BoardArgs,
    },
    Move {
        id: ItemId,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
        #[arg(long)]
        z: Option<i32>,
    },
    Resize {
        id: ItemId,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },
    Caption(CaptionArgs),
    /// Apply one caption style to every item.
    StyleAll(StyleArgs),
    /// Send a raw JSON patch, e.g. `{"z_index": 5}`.
    Update {
        id: ItemId,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: ItemId,
    },
}

#[derive(Args, Debug)]
struct BoardArgs {
    #[arg(long, default_value_t = 800.0)]
    board_width: f64,
    #[arg(long, default_value_t = 400.0)]
    board_height: f64,
}

#[derive(Args, Debug)]
struct CaptionArgs {
    id: ItemId,
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    bold: Option<bool>,
    #[arg(long)]
    align: Option<String>,
    #[arg(long, help = "Caption text color, e.g. #FFFFFF")]
    text_color: Option<String>,
    #[arg(long, help = "Caption background, e.g. rgba(0, 0, 0, 0.7)")]
    background: Option<String>,
}

#[derive(Args, Debug)]
struct StyleArgs {
    #[arg(long, default_value = "#FFFFFF")]
    text_color: String,
    #[arg(long, default_value = "#000000")]
    background: String,
    #[arg(long, default_value_t = 70, value_parser = clap::value_parser!(u8).range(0..=100))]
    opacity: u8,
    #[arg(long, default_value_t = false)]
    bold: bool,
    #[arg(long, default_value = "center")]
    align: String,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    // The health probe is the only command that is not scoped to a member.
    let member_id = match (&cli.command, cli.member_id.as_deref()) {
        (_, Some(member_id)) => member_id,
        (Command::Ping, None) => "",
        (_, None) => return Err(CliError::MissingMemberId),
    };
    let api = VisionBoardApi::new(&cli.base_url, member_id, cli.team_id.as_deref());
    run(api, cli.command).await
}

async fn run(api: VisionBoardApi, command: Command) -> Result<(), CliError> {
    match command {
        Command::Ping => {
            api.ping().await?;
            println!("ok");
        }
        Command::List => print_json(&api.list_items().await?)?,
        Command::Upload { path, mime, board } => {
            let mime = match mime {
                Some(mime) => mime,
                None => guess_mime(&path)?,
            };
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| CliError::Read { path: path.display().to_string(), source })?;
            let mut session = BoardSession::new(api, BoardSize::new(board.board_width, board.board_height));
            session.load().await?;
            let id = session.upload(&mime, &bytes).await?;
            if let Some(item) = session.engine().item(id) {
                print_json(item)?;
            }
        }
        Command::Move { id, x, y, z } => {
            let patch = ItemPatch { x_position: Some(x), y_position: Some(y), z_index: z, ..ItemPatch::default() };
            print_json(&api.update_item(id, &patch).await?)?;
        }
        Command::Resize { id, width, height } => {
            print_json(&api.update_item(id, &ItemPatch::size(width, height)).await?)?;
        }
        Command::Caption(args) => {
            let id = args.id;
            let patch = caption_patch(args)?;
            print_json(&api.update_item(id, &patch).await?)?;
        }
        Command::StyleAll(args) => {
            let style = caption_style(&args)?;
            let mut session = BoardSession::new(api, BoardSize::default());
            let count = session.load().await?;
            session.apply_style_to_all(&style).await?;
            println!("styled {count} items");
        }
        Command::Update { id, data } => {
            let patch: ItemPatch = serde_json::from_str(&data)?;
            if patch.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            print_json(&api.update_item(id, &patch).await?)?;
        }
        Command::Delete { id } => {
            api.delete_item(id).await?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn guess_mime(path: &std::path::Path) -> Result<String, CliError> {
    let name = path.to_string_lossy();
    mime_from_file_name(&name).map(str::to_owned).ok_or_else(|| CliError::UnknownImageType(name.into_owned()))
}

fn parse_color(raw: &str) -> Result<Rgba, CliError> {
    Rgba::parse_css(raw).ok_or_else(|| CliError::InvalidColor(raw.to_owned()))
}

fn parse_align(raw: &str) -> Result<TextAlign, CliError> {
    TextAlign::parse(raw).ok_or_else(|| CliError::InvalidAlign(raw.to_owned()))
}

fn caption_patch(args: CaptionArgs) -> Result<ItemPatch, CliError> {
    let patch = ItemPatch {
        text: args.text,
        is_bold: args.bold,
        text_align: args.align.as_deref().map(parse_align).transpose()?,
        text_color: args.text_color.as_deref().map(|c| parse_color(c).map(|c| c.rgb.to_hex())).transpose()?,
        background_color: args.background.as_deref().map(|c| parse_color(c).map(|c| c.to_css())).transpose()?,
        ..ItemPatch::default()
    };
    if patch.is_empty() {
        return Err(CliError::EmptyUpdate);
    }
    Ok(patch)
}

fn caption_style(args: &StyleArgs) -> Result<CaptionStyle, CliError> {
    let background: Rgb = parse_color(&args.background)?.rgb;
    Ok(CaptionStyle {
        text_color: parse_color(&args.text_color)?.rgb,
        background: Rgba::from_opacity_percent(background, args.opacity),
        is_bold: args.bold,
        text_align: parse_align(&args.align)?,
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
