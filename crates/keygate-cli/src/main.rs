//! Keygate 운영 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 설정 파일의 [[users]]에 넣을 비밀번호 해시 생성
//! keygate hash-password --password 'correct-horse-1'
//! echo 'correct-horse-1' | keygate hash-password
//!
//! # 발급된 토큰 검사 (KEYGATE__AUTH__SECRET_KEY 또는 설정 파일 필요)
//! keygate inspect-token eyJhbGciOiJIUzI1NiIs... --config config/default.toml
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

use keygate_cli::commands::hash_password::{self, HashPasswordConfig};
use keygate_cli::commands::inspect_token::{self, InspectTokenConfig};
use keygate_core::{init_logging, LogConfig};

#[derive(Parser)]
#[command(name = "keygate")]
#[command(about = "Keygate CLI - 비밀번호 해시 생성 및 토큰 검사", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 비밀번호 해시 생성 (Argon2id PHC 문자열)
    HashPassword {
        /// 해싱할 비밀번호 (생략하면 표준 입력에서 한 줄 읽음)
        #[arg(short, long)]
        password: Option<String>,

        /// 비밀번호 강도 검사 생략
        #[arg(long, default_value = "false")]
        skip_strength_check: bool,
    },

    /// Bearer 토큰 검증 및 내용 출력
    InspectToken {
        /// 검사할 토큰
        token: String,

        /// 설정 파일 (기본: config/default.toml, 없으면 환경 변수)
        #[arg(short, long)]
        config: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 명령 결과는 stdout, 로그는 stderr
    init_logging(LogConfig::from_env().with_stderr(true))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::HashPassword {
            password,
            skip_strength_check,
        } => {
            let config = HashPasswordConfig {
                password,
                skip_strength_check,
            };
            match hash_password::run(config, std::io::stdin().lock()) {
                Ok(hash) => println!("{}", hash),
                Err(e) => {
                    error!("Hashing failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::InspectToken { token, config } => {
            let config = InspectTokenConfig {
                token,
                config_path: config,
            };
            match inspect_token::run(config) {
                Ok(report) => println!("{}", report),
                Err(e) => {
                    error!("Token inspection failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
