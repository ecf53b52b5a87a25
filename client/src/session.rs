use std::{str::FromStr, sync::Arc};

use handlebars::TemplateError;
use log::{debug, error, info, warn};
use shared_libs::json_templates::{PhotoDetail, PhotoSummary};
use thiserror::Error;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt},
    select,
    sync::mpsc,
};

use crate::{
    config::Config,
    detail::{DetailLoader, DetailRequest},
    error::FetchError,
    gallery::{GalleryLoader, GridLayout, PageRequest},
    media::PhotoSource,
    render::Renderer,
    router::{Navigator, Route},
};

const HELP: &str = "\
commands:
  open <path>      go to a path, e.g. /photos or /photos/<id>
  photo <n>        open the n-th photo of the gallery
  down [rows]      scroll the gallery down
  up [rows]        scroll the gallery up
  top              scroll back to the top
  back / forward   move through history
  reload           draw the current view again
  quit             leave
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(String),
    Photo(usize),
    Down(Option<usize>),
    Up(Option<usize>),
    Top,
    Back,
    Forward,
    Reload,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?}, type help for a list")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("expected a number, got {0:?}")]
    InvalidNumber(String),
}

fn number(arg: &str) -> Result<usize, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Command, CommandError> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_ascii_lowercase();
        let arg = words.next();

        let command = match (name.as_str(), arg) {
            ("open" | "go", Some(path)) => Command::Open(path.to_string()),
            ("open" | "go", None) => return Err(CommandError::MissingArgument("open")),
            ("photo", Some(n)) => Command::Photo(number(n)?),
            ("photo", None) => return Err(CommandError::MissingArgument("photo")),
            ("down" | "j", rows) => Command::Down(rows.map(number).transpose()?),
            ("up" | "k", rows) => Command::Up(rows.map(number).transpose()?),
            ("top", _) => Command::Top,
            ("back" | "b", _) => Command::Back,
            ("forward" | "f", _) => Command::Forward,
            ("reload" | "r", _) | ("", _) => Command::Reload,
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit" | "q", _) => Command::Quit,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// A finished fetch, delivered back to the session loop.
#[derive(Debug)]
pub enum Completion {
    Page(PageRequest, Result<Vec<PhotoSummary>, FetchError>),
    Detail(DetailRequest, Result<PhotoDetail, FetchError>),
}

pub enum Screen {
    Gallery(GalleryLoader),
    Detail(DetailLoader),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The interactive gallery: one screen at a time, driven by typed commands and fetch completions.
pub struct Session {
    source: Arc<dyn PhotoSource>,
    config: Config,
    layout: GridLayout,
    navigator: Navigator,
    screen: Screen,
    renderer: Renderer,
    notice: Option<String>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Session {
    pub fn new(
        source: Arc<dyn PhotoSource>,
        config: Config,
        layout: GridLayout,
        start: &str,
    ) -> Result<Session, TemplateError> {
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Session {
            source,
            config,
            layout,
            navigator: Navigator::new(start),
            screen: Screen::NotFound,
            renderer: Renderer::new()?,
            notice: None,
            tx,
            rx,
        })
    }

    /// Mount the view for the starting path.
    pub fn start(&mut self) {
        let route = self.navigator.current();
        self.show(route);
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Open(path) => {
                let route = self.navigator.navigate(&path);
                self.show(route);
            }
            Command::Photo(n) => {
                let Screen::Gallery(gallery) = &self.screen else {
                    self.notice = Some(String::from("photo only works in the gallery"));
                    return Flow::Continue;
                };
                match gallery.photo(n) {
                    Some(photo) => {
                        let path = Route::detail_path(&photo.id);
                        let route = self.navigator.navigate(&path);
                        self.show(route);
                    }
                    None => self.notice = Some(format!("there is no photo {}", n)),
                }
            }
            Command::Down(rows) => {
                let rows = self.scroll_rows(rows);
                self.scroll(rows);
            }
            Command::Up(rows) => {
                let rows = self.scroll_rows(rows);
                self.scroll(rows.saturating_neg());
            }
            Command::Top => {
                if let Screen::Gallery(gallery) = &mut self.screen {
                    gallery.scroll_to_top();
                }
            }
            Command::Back => match self.navigator.back() {
                Some(route) => self.show(route),
                None => self.notice = Some(String::from("nothing to go back to")),
            },
            Command::Forward => match self.navigator.forward() {
                Some(route) => self.show(route),
                None => self.notice = Some(String::from("nothing to go forward to")),
            },
            Command::Reload => {}
            Command::Help => self.notice = Some(HELP.to_string()),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Hand a finished fetch to the screen that issued it, returns whether anything changed.
    pub fn apply(&mut self, completion: Completion) -> bool {
        match (completion, &mut self.screen) {
            (Completion::Page(request, result), Screen::Gallery(gallery)) => {
                gallery.apply_page(&request, result)
            }
            (Completion::Detail(request, result), Screen::Detail(detail)) => {
                detail.apply_detail(&request, result)
            }
            (completion, _) => {
                debug!("dropping completion for a view that is gone: {:?}", completion);
                false
            }
        }
    }

    /// Wait for the next fetch to finish.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }

    pub fn render(&mut self) -> String {
        let body = match &self.screen {
            Screen::Gallery(gallery) => self.renderer.gallery(&gallery.view()),
            Screen::Detail(detail) => self.renderer.detail(&detail.view()),
            Screen::NotFound => self.renderer.not_found(),
        };

        let mut out = format!("\n@ {}\n", self.navigator.current_path());
        match body {
            Ok(body) => out.push_str(&body),
            Err(e) => {
                error!("unable to render {}: {}", self.navigator.current_path(), e);
                out.push_str("unable to draw this view\n");
            }
        }
        if let Some(notice) = self.notice.take() {
            out.push_str(&notice);
            out.push('\n');
        }
        out.push_str("> ");
        out
    }

    /// Run until `quit`, end of input, or ctrl-c.
    pub async fn run<R, W>(mut self, input: R, mut output: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        self.start();
        output.write_all(self.render().as_bytes()).await?;
        output.flush().await?;

        loop {
            let redraw = select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("input closed, leaving");
                        break;
                    };
                    match line.parse::<Command>() {
                        Ok(command) => {
                            if self.handle(command) == Flow::Quit {
                                break;
                            }
                        }
                        Err(e) => self.notice = Some(e.to_string()),
                    }
                    true
                }
                Some(completion) = self.rx.recv() => self.apply(completion),
                _ = tokio::signal::ctrl_c() => {
                    info!("ctrl-c received, leaving");
                    break;
                }
            };

            if redraw {
                output.write_all(self.render().as_bytes()).await?;
                output.flush().await?;
            }
        }

        self.unmount();
        Ok(())
    }

    /// Row count for a scroll command, a screenful when none is given.
    fn scroll_rows(&self, rows: Option<usize>) -> isize {
        isize::try_from(rows.unwrap_or(self.layout.rows)).unwrap_or(isize::MAX)
    }

    fn scroll(&mut self, rows: isize) {
        let request = match &mut self.screen {
            Screen::Gallery(gallery) => gallery.scroll_by(rows),
            _ => {
                self.notice = Some(String::from("nothing to scroll here"));
                None
            }
        };
        if let Some(request) = request {
            self.spawn_page(request);
        }
    }

    fn unmount(&mut self) {
        match &mut self.screen {
            Screen::Gallery(gallery) => gallery.cancel(),
            Screen::Detail(detail) => detail.cancel(),
            Screen::NotFound => {}
        }
    }

    /// Replace the current screen with a freshly mounted one for `route`.
    fn show(&mut self, route: Route) {
        self.unmount();
        debug!("showing {:?}", route);

        match route {
            Route::Gallery => {
                let mut gallery = GalleryLoader::new(self.source.clone(), &self.config, self.layout);
                let request = gallery.mount();
                self.screen = Screen::Gallery(gallery);
                if let Some(request) = request {
                    self.spawn_page(request);
                }
            }
            Route::Detail { id } => {
                let mut detail = DetailLoader::new(self.source.clone());
                let request = detail.set_id(&id);
                self.screen = Screen::Detail(detail);
                if let Some(request) = request {
                    self.spawn_detail(request);
                }
            }
            Route::NotFound => {
                warn!("no route for {}", self.navigator.current_path());
                self.screen = Screen::NotFound;
            }
        }
    }

    fn spawn_page(&self, request: PageRequest) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = request.fetch(source.as_ref()).await;
            // the session may already be gone, nothing left to update then
            let _ = tx.send(Completion::Page(request, result));
        });
    }

    fn spawn_detail(&self, request: DetailRequest) {
        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = request.fetch(source.as_ref()).await;
            let _ = tx.send(Completion::Detail(request, result));
        });
    }
}
