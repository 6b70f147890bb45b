use std::process::{Command, Output};

fn scm(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scm"))
        .args(args)
        .output()
        .expect("cannot spawn scm")
}

fn stdout(output: &Output) -> &str {
    std::str::from_utf8(&output.stdout).unwrap()
}

#[test]
fn decode_prints_one_line() {
    let output = scm(&["decode", "0x6F"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "#t\n");

    let output = scm(&["decode", "12"]);
    assert_eq!(stdout(&output), "3\n");

    let output = scm(&["decode", "0x0a0f"]);
    assert_eq!(stdout(&output), "#\\newline\n");
}

#[test]
fn decode_gap_has_its_own_status() {
    let output = scm(&["decode", "0x07"]);
    assert_eq!(output.status.code(), Some(6));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn missing_image_fails_before_running() {
    let output = scm(&["run", "/definitely/not/here.bin"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn zero_stack_size_is_a_usage_error() {
    let output = scm(&["run", "entry.bin", "--stack-size", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

#[cfg(target_arch = "x86_64")]
mod x86_64 {
    use std::io::Write;

    use super::*;

    fn image(code: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(code).unwrap();
        file.flush().unwrap();
        file
    }

    fn run(code: &[u8], extra: &[&str]) -> Output {
        let file = image(code);
        let path = file.path().to_str().unwrap();
        let mut args = vec!["run", path];
        args.extend_from_slice(extra);
        scm(&args)
    }

    /// `mov rax, imm32 ; ret`
    fn returning(word: u32) -> Vec<u8> {
        let mut code = vec![0x48, 0xC7, 0xC0];
        code.extend_from_slice(&word.to_le_bytes());
        code.push(0xC3);
        code
    }

    #[test]
    fn runs_an_image_and_prints_its_value() {
        let cases = [
            (3 << 2, "3\n"),
            (0x6F, "#t\n"),
            (0x2F, "#f\n"),
            (0x3F, "()\n"),
            ((10 << 8) | 0x0F, "#\\newline\n"),
            ((65 << 8) | 0x0F, "#\\A\n"),
        ];

        for (word, expected) in cases {
            let output = run(&returning(word), &[]);
            assert!(output.status.success(), "{output:?}");
            assert_eq!(stdout(&output), expected);
        }
    }

    #[test]
    fn negative_fixnums_keep_their_sign() {
        // mov rax, -40 (sign extended) ; ret
        let output = run(&[0x48, 0xC7, 0xC0, 0xD8, 0xFF, 0xFF, 0xFF, 0xC3], &[]);
        assert_eq!(stdout(&output), "-10\n");
    }

    #[test]
    fn image_runs_on_the_guarded_stack() {
        #[rustfmt::skip]
        let code = [
            0x48, 0x89, 0xE1,                         // mov rcx, rsp
            0x48, 0x89, 0xFC,                         // mov rsp, rdi
            0x48, 0xC7, 0xC0, 0x28, 0x00, 0x00, 0x00, // mov rax, 40
            0x50,                                     // push rax
            0x48, 0x31, 0xC0,                         // xor rax, rax
            0x58,                                     // pop rax
            0x48, 0x89, 0xCC,                         // mov rsp, rcx
            0xC3,                                     // ret
        ];
        let output = run(&code, &["--stack-size", "4096"]);
        assert!(output.status.success(), "{output:?}");
        assert_eq!(stdout(&output), "10\n");
    }

    #[test]
    fn overflowing_the_stack_is_a_hardware_fault() {
        #[rustfmt::skip]
        let code = [
            0x48, 0x89, 0xFC,                         // mov rsp, rdi
            0x48, 0x81, 0xEC, 0x00, 0x10, 0x00, 0x00, // sub rsp, 0x1000
            0x50,                                     // push rax
            0xC3,                                     // ret
        ];
        let output = run(&code, &["--stack-size", "4096"]);
        assert!(!output.status.success());
        assert!(output.status.code().is_none(), "{output:?}");
        assert!(output.stdout.is_empty());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn reservation_failure_has_its_own_status() {
        let output = run(&returning(0x6F), &["--stack-size", "0x4000000000000"]);
        assert_eq!(output.status.code(), Some(3));
        assert!(output.stdout.is_empty());
    }
}
