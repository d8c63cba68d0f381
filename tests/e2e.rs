use std::fs;
use std::io;
use std::path::Path;

use structopt::StructOpt;

use promkafka::cliopt::CliOpt;
use promkafka::runner::Runner;

#[test]
fn e2e() -> Result<(), Box<dyn std::error::Error>> {
    let root_test_dir = Path::new(file!()).parent().unwrap().join("scenarios");

    for test_dir in fs::read_dir(&root_test_dir)? {
        let test_dir = test_dir?.path();

        if let Ok(filter) = std::env::var("E2E_CASE") {
            if !test_dir.as_os_str().to_string_lossy().ends_with(&filter) {
                continue;
            }
        }

        let cli_args: Vec<String> =
            serde_json::from_str(&fs::read_to_string(test_dir.join("args.json"))?)?;

        let actual_output = run(
            io::BufReader::new(fs::File::open(test_dir.join("input"))?),
            &cli_args,
        )?;

        let expected_output = fs::read(test_dir.join("output"))?;

        assert_eq!(
            expected_output,
            actual_output,
            "\nUnexpected output in '{}'.\nExpected:\n{}\nActual:\n{}",
            test_dir.display(),
            String::from_utf8_lossy(&expected_output),
            String::from_utf8_lossy(&actual_output),
        );
    }

    Ok(())
}

fn run<R: io::Read>(input: R, cli_args: &[String]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let opt = CliOpt::from_iter(cli_args);
    let runner = Runner::from_opt(&opt)?;

    let mut output = Vec::new();
    runner.run(input, &mut output)?;
    Ok(output)
}
