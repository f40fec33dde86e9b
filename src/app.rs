//! 控制台应用
//!
//! 从标准输入读取命令驱动标注会话，界面输出到标准输出，诊断日志走 stderr。

use crate::clients::{ProblemBackend, ProblemClient};
use crate::config::Config;
use crate::utils::logging::log_startup;
use crate::view;
use crate::workflow::{AnnotationController, Direction, SaveOutcome};
use anyhow::Result;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{info, warn};

const HELP: &str = "\
命令:
  list              显示题目列表
  show              显示当前题目
  select <id>       选中题目
  edit              多行编辑，单独一行 . 结束
  set <text>        用一行文本替换编辑内容
  save              保存
  save-next         保存并前进到下一题
  next / prev       下一题 / 上一题
  upload <path>     上传数据文件
  refresh           重新获取题目
  preview [path]    写出 HTML 预览
  help              显示帮助
  quit              退出
";

/// 控制台命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Show,
    Select(String),
    Edit,
    Set(String),
    Save,
    SaveNext,
    Navigate(Direction),
    Upload(PathBuf),
    Refresh,
    Preview(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    /// 解析一行输入，空行返回 `Ok(None)`
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "show" => Command::Show,
            "select" | "sel" => {
                if arg.is_empty() {
                    return Err("select 需要题目 ID".to_string());
                }
                Command::Select(arg.to_string())
            }
            "edit" => Command::Edit,
            "set" => Command::Set(arg.to_string()),
            "save" => Command::Save,
            "save-next" | "sn" => Command::SaveNext,
            "next" | "n" | "prev" | "previous" | "p" => Command::Navigate(name.parse()?),
            "upload" => {
                if arg.is_empty() {
                    return Err("upload 需要文件路径".to_string());
                }
                Command::Upload(PathBuf::from(arg))
            }
            "refresh" | "r" => Command::Refresh,
            "preview" => Command::Preview((!arg.is_empty()).then(|| PathBuf::from(arg))),
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("未知命令: {}，输入 help 查看帮助", other)),
        };

        Ok(Some(command))
    }
}

/// 应用主结构
pub struct App<B = ProblemClient> {
    config: Config,
    controller: AnnotationController<B>,
}

impl App<ProblemClient> {
    /// 初始化应用并做首次加载
    ///
    /// 首次加载失败不会终止程序，之后可以用 refresh 重试。
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = ProblemClient::new(&config)?;
        let mut app = Self::with_backend(config, client);

        if let Err(e) = app.controller.refresh().await {
            warn!("⚠️ 首次加载失败，可稍后使用 refresh 重试: {}", e);
        }

        Ok(app)
    }
}

impl<B: ProblemBackend> App<B> {
    pub fn with_backend(config: Config, backend: B) -> Self {
        Self {
            config,
            controller: AnnotationController::new(backend),
        }
    }

    pub fn controller(&self) -> &AnnotationController<B> {
        &self.controller
    }

    /// 从标准输入运行命令循环
    pub async fn run(self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        self.run_with(stdin).await
    }

    /// 从任意输入运行命令循环，输入结束或 quit 时返回
    pub async fn run_with<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<()> {
        let mut lines = input.lines();

        println!(
            "{}",
            view::render_screen(self.controller.state(), self.controller.renderer())
        );
        println!("输入 help 查看命令");

        while let Some(line) = lines.next_line().await? {
            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            let output = self.execute(command, &mut lines).await?;
            if !output.is_empty() {
                print!("{}", output);
            }
        }

        info!("👋 会话结束");
        Ok(())
    }

    /// 执行一条命令，返回要显示的内容
    ///
    /// 后端和文件错误已在控制器中记录，这里只做提示，会话继续。
    pub async fn execute<R: AsyncBufRead + Unpin>(
        &mut self,
        command: Command,
        lines: &mut Lines<R>,
    ) -> Result<String> {
        let state_screen = |controller: &AnnotationController<B>| {
            view::render_screen(controller.state(), controller.renderer())
        };

        let output = match command {
            Command::List => view::render_problem_list(self.controller.state()),
            Command::Show => state_screen(&self.controller),
            Command::Select(id) => {
                if self.controller.select_problem(&id) {
                    view::render_current(self.controller.state(), self.controller.renderer())
                } else {
                    format!("题目 {} 不存在\n", id)
                }
            }
            Command::Edit => {
                let mut text = Vec::new();
                while let Some(line) = lines.next_line().await? {
                    if line == "." {
                        break;
                    }
                    text.push(line);
                }
                self.controller.edit_buffer(text.join("\n"));
                view::render_current(self.controller.state(), self.controller.renderer())
            }
            Command::Set(text) => {
                self.controller.edit_buffer(text);
                view::render_current(self.controller.state(), self.controller.renderer())
            }
            Command::Save => self.save(false).await,
            Command::SaveNext => self.save(true).await,
            Command::Navigate(direction) => {
                self.controller.navigate(direction);
                view::render_current(self.controller.state(), self.controller.renderer())
            }
            Command::Upload(path) => match self.controller.ingest_file(&path).await {
                Ok(_) => state_screen(&self.controller),
                Err(_) => format!("上传 {} 失败\n", path.display()),
            },
            Command::Refresh => match self.controller.refresh().await {
                Ok(_) => state_screen(&self.controller),
                Err(_) => "刷新失败，保留当前内容\n".to_string(),
            },
            Command::Preview(path) => {
                let path = path.unwrap_or_else(|| PathBuf::from(&self.config.preview_file));
                match self.controller.write_preview(&path).await {
                    Ok(true) => format!("预览已写入 {}\n", path.display()),
                    Ok(false) => "没有选中的题目\n".to_string(),
                    Err(_) => format!("写入 {} 失败\n", path.display()),
                }
            }
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };

        Ok(output)
    }

    async fn save(&mut self, advance: bool) -> String {
        match self.controller.save(advance).await {
            Ok(SaveOutcome::Saved) => {
                view::render_screen(self.controller.state(), self.controller.renderer())
            }
            Ok(SaveOutcome::Skipped) => "没有选中的题目\n".to_string(),
            Err(_) => "保存失败，编辑内容已保留\n".to_string(),
        }
    }
}
