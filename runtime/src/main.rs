use std::io::Write as _;
use std::sync::Arc;

use anyhow::Context;
use chat::{
    attachment, ChatEvent, HttpChatClient, HttpTranscriber, MessageLog, Role, StreamConsumer,
    Transcriber,
};
use clap::Parser;
use dotenvy::dotenv;
use log::{info, warn};
use speech::{AudioSink, Narrator, RodioSink};
use tokio::io::{AsyncBufReadExt, BufReader};
use tts::{HttpSynthesizer, SynthesisCache};

use causerie::store::{ConversationStore, MemoryStore};
use causerie::{conversation_title, Config};

const GREETING: &str =
    "Bonjour 👋 Je suis ton assistant intelligent. Comment puis-je t'aider aujourd'hui ?";
const TRANSCRIPTION_FAILURE_NOTICE: &str = "Erreur lors de la transcription.";

#[derive(Parser)]
#[command(name = "causerie", about = "Assistant conversationnel qui lit ses réponses à voix haute")]
struct Args {
    /// Voix de narration
    #[arg(long)]
    voice: Option<String>,
    /// Démarrer sans narration
    #[arg(long)]
    mute: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    let args = Args::parse();
    let config = Config::from_env();
    let voice = args.voice.unwrap_or_else(|| config.voice.clone());

    let synth = Arc::new(HttpSynthesizer::new(&config.synthesis_url));
    let cache = Arc::new(SynthesisCache::new(synth));
    let sink: Arc<dyn AudioSink> =
        Arc::new(RodioSink::spawn().context("impossible d'ouvrir la sortie audio")?);
    let narrator = Arc::new(Narrator::new(cache, sink, voice));

    let consumer = StreamConsumer::new(Arc::new(HttpChatClient::new(&config.completion_url)));
    let transcriber = HttpTranscriber::new(
        &config.transcription_url,
        config.transcription_key.clone(),
    );
    let store = MemoryStore::new();

    let mut log = MessageLog::new();
    log.push(Role::Assistant, GREETING);
    println!("assistant: {GREETING}");
    println!("(/stop coupe la lecture, /muet la désactive, /parle la réactive, /image <fichier> joint une image, /dicter <fichier> transcrit un enregistrement, /quitter pour sortir)");

    let mut narration_enabled = !args.mute;
    let mut pending_image: Option<String> = None;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("toi> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim().to_string();
        if input.is_empty() {
            continue;
        }

        match input.as_str() {
            "/quitter" => break,
            "/stop" => {
                narrator.interrupt().await;
                continue;
            }
            "/muet" => {
                narration_enabled = false;
                narrator.interrupt().await;
                continue;
            }
            "/parle" => {
                narration_enabled = true;
                continue;
            }
            _ => {}
        }
        if let Some(path) = input.strip_prefix("/image ") {
            let path = path.trim();
            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    pending_image = Some(attachment::encode_image(&bytes, mime_for(path)));
                    println!("(image jointe au prochain message)");
                }
                Err(e) => warn!("image illisible {path:?}: {e}"),
            }
            continue;
        }

        let turn_text = if let Some(path) = input.strip_prefix("/dicter ") {
            let path = path.trim();
            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("enregistrement illisible {path:?}: {e}");
                    continue;
                }
            };
            match transcriber.transcribe(bytes).await {
                Ok(text) if !text.is_empty() => text,
                Ok(_) => {
                    println!("(rien entendu dans l'enregistrement)");
                    continue;
                }
                Err(e) => {
                    warn!("transcription impossible: {e}");
                    log.push(Role::Assistant, TRANSCRIPTION_FAILURE_NOTICE);
                    println!("assistant: {TRANSCRIPTION_FAILURE_NOTICE}");
                    continue;
                }
            }
        } else {
            input.clone()
        };

        // A fresh turn supersedes whatever is still being narrated.
        narrator.interrupt().await;

        let first_user_turn = !log.messages().iter().any(|m| m.role == Role::User);
        log.push(Role::User, &turn_text);
        store.append(Role::User, &turn_text).await?;
        if first_user_turn {
            store.set_title(&conversation_title(&turn_text)).await?;
        }
        if turn_text != input {
            println!("toi (dicté)> {turn_text}");
        }

        let mut events = consumer.subscribe();
        let printer = tokio::spawn(async move {
            let mut shown = 0usize;
            while let Ok(event) = events.recv().await {
                match event {
                    ChatEvent::Partial(text) => {
                        print!("{}", &text[shown..]);
                        let _ = std::io::stdout().flush();
                        shown = text.len();
                    }
                    ChatEvent::Completed(_) => {
                        println!();
                        break;
                    }
                    ChatEvent::Failed(notice) => {
                        if shown == 0 {
                            print!("{notice}");
                        }
                        println!();
                        break;
                    }
                }
            }
        });

        print!("assistant: ");
        std::io::stdout().flush()?;
        let image = pending_image.take();
        match consumer.stream_reply(&mut log, image.as_deref()).await {
            Ok(final_text) => {
                store.append(Role::Assistant, &final_text).await?;
                if narration_enabled {
                    let narrator = narrator.clone();
                    tokio::spawn(async move {
                        narrator.speak(&final_text).await;
                    });
                }
            }
            Err(e) => info!("tour abandonné: {e}"),
        }
        let _ = printer.await;
    }

    narrator.interrupt().await;
    Ok(())
}

fn mime_for(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
