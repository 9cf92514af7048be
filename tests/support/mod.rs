#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;

pub const VALID_DESCRIPTOR: &str = "\
name: Foo
alias: Foo Addon
description: Adds foo to everything
author: someone
repo: myuser/myrepo
branch: main
tags: [utility]
";

pub const PROXY_VARS: &[&str] = &[
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
];

pub fn write_descriptor(dir: &Path, file_name: &str, contents: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, contents).expect("write descriptor fixture");
    path
}

/// `validate-addon` wired to a local release server with a clean environment.
pub fn validator_command(server: &ReleaseServer) -> Command {
    validator_command_for(server.base_url())
}

/// Same as [`validator_command`] but against an arbitrary API base URL.
pub fn validator_command_for(api_base: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_validate-addon"));
    cmd.env("ADDON_REGISTRY_API_URL", api_base)
        .env_remove("ADDON_REGISTRY_SKIP_REMOTE")
        .env_remove("GITHUB_TOKEN")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env("no_proxy", "127.0.0.1,localhost");
    for var in PROXY_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Loopback URL with nothing listening behind it.
pub fn unreachable_api_base() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").context("reserving a loopback port")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}

pub fn build_addons_command(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_build-addons"));
    cmd.current_dir(dir);
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Run a command that is allowed to fail; returns exit code and stdout lines.
pub fn run_allowing_failure(mut cmd: Command) -> Result<(i32, Vec<String>)> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    let code = output
        .status
        .code()
        .with_context(|| format!("command {:?} terminated by signal", cmd))?;
    let lines = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    Ok((code, lines))
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub accept: Option<String>,
}

/// Minimal HTTP/1.1 responder standing in for the GitHub releases API.
///
/// Requests for unregistered paths get a 404. The accept loop runs on a
/// detached thread for the lifetime of the test process.
pub struct ReleaseServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ReleaseServer {
    pub fn start(routes: &[(&str, u16, &str)]) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").context("binding release server")?;
        let addr = listener.local_addr()?;
        let routes: BTreeMap<String, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else {
                    continue;
                };
                let _ = respond(stream, &routes, &recorded);
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            requests,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .clone()
    }
}

fn respond(
    mut stream: TcpStream,
    routes: &BTreeMap<String, (u16, String)>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();

    let mut accept = None;
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 || line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("accept") {
                accept = Some(value.trim().to_string());
            }
        }
    }

    recorded
        .lock()
        .unwrap_or_else(|err| err.into_inner())
        .push(RecordedRequest {
            path: path.clone(),
            accept,
        });

    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or_else(|| (404, r#"{"message":"Not Found"}"#.to_string()));
    let response = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        if status == 200 { "OK" } else { "Status" },
        body.len()
    );
    stream.write_all(response.as_bytes())?;
    stream.flush()
}
