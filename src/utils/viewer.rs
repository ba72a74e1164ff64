//! # 图像查看器
//!
//! 用系统默认程序打开生成的图像。
//!
//! ## 依赖关系
//! - 被 `commands/scan.rs` 使用
//! - 无外部模块依赖

use crate::error::{LatscanError, Result};

use std::path::Path;
use std::process::{Command, Stdio};

/// 当前平台的打开命令及其前置参数
fn opener() -> (&'static str, Vec<&'static str>) {
    if cfg!(target_os = "macos") {
        ("open", vec![])
    } else if cfg!(target_os = "windows") {
        ("cmd", vec!["/C", "start", ""])
    } else {
        ("xdg-open", vec![])
    }
}

/// 在后台打开图像，不等待查看器退出
pub fn open_image(path: &Path) -> Result<()> {
    let (program, prefix) = opener();

    Command::new(program)
        .args(&prefix)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LatscanError::CommandNotFound {
                command: program.to_string(),
            },
            _ => LatscanError::CommandFailed {
                command: format!("{} {}", program, path.display()),
                stderr: e.to_string(),
            },
        })?;

    Ok(())
}
