//! Java sources in the shapes the built-in recipes migrate.

/// A rule check as generated before the shared base class existed.
#[derive(Debug, Clone)]
pub struct LegacyCheck {
    pub category: String,
    pub key: String,
    pub class_name: String,
    pub description: String,
    /// Lines placed inside `scanFile`, already indented.
    pub scan_body: String,
}

impl LegacyCheck {
    pub fn new(key: &str, class_name: &str) -> Self {
        Self {
            category: "structure".into(),
            key: key.into(),
            class_name: class_name.into(),
            description: format!("{class_name} rule"),
            scan_body: "    // Analyze parsedFile and report issues using reportIssue()\n".into(),
        }
    }

    pub fn scan_body(mut self, body: &str) -> Self {
        self.scan_body = body.into();
        self
    }

    pub fn file_name(&self) -> String {
        format!("{}.java", self.class_name)
    }

    /// Source implementing `MuleSoftCheck` with its own issue helper.
    pub fn legacy(&self) -> String {
        let Self {
            category,
            key,
            class_name,
            description,
            scan_body,
        } = self;
        format!(
            r#"package com.lioncorp.sonar.mulesoft.checks.{category};

import com.lioncorp.sonar.mulesoft.MuleSoftCheck;
import com.lioncorp.sonar.mulesoft.parser.MuleSoftFileParser;
import org.sonar.api.batch.fs.InputFile;
import org.sonar.api.batch.sensor.SensorContext;
import org.sonar.api.batch.sensor.issue.NewIssue;
import org.sonar.api.batch.sensor.issue.NewIssueLocation;
import org.sonar.api.rule.RuleKey;
import org.sonar.check.Rule;

/**
 * {description}.
 */
@Rule(key = "{key}")
public class {class_name} implements MuleSoftCheck {{

  private static final String REPOSITORY_KEY = "mulesoft";
  private static final String RULE_KEY = "{key}";

  @Override
  public void scanFile(SensorContext context, InputFile inputFile, MuleSoftFileParser.ParsedMuleSoftFile parsedFile) {{
{scan_body}  }}

  private void reportIssue(SensorContext context, InputFile inputFile, String message) {{
    NewIssue issue = context.newIssue();
    NewIssueLocation location = issue.newLocation()
        .on(inputFile)
        .message(message);

    issue
        .at(location)
        .forRule(RuleKey.of(REPOSITORY_KEY, RULE_KEY))
        .save();
  }}
}}
"#
        )
    }

    /// The same check extending `BaseCheck`.
    pub fn migrated(&self) -> String {
        let Self {
            category,
            key,
            class_name,
            description,
            scan_body,
        } = self;
        format!(
            r#"package com.lioncorp.sonar.mulesoft.checks.{category};

import com.lioncorp.sonar.mulesoft.checks.BaseCheck;
import com.lioncorp.sonar.mulesoft.parser.MuleSoftFileParser;
import org.sonar.api.batch.fs.InputFile;
import org.sonar.api.batch.sensor.SensorContext;
import org.sonar.check.Rule;

/**
 * {description}.
 */
@Rule(key = "{key}")
public class {class_name} extends BaseCheck {{

  @Override
  protected String getRuleKey() {{
    return "{key}";
  }}

  @Override
  public void scanFile(SensorContext context, InputFile inputFile, MuleSoftFileParser.ParsedMuleSoftFile parsedFile) {{
{scan_body}  }}
}}
"#
        )
    }
}

/// A test class mocking `org.w3c.dom.Document`. With `other_mocks`, it also
/// mocks an `InputFile`, so the Mockito import stays in use.
pub fn document_mock_test(class_name: &str, other_mocks: bool) -> String {
    let input_file = if other_mocks {
        "        InputFile inputFile = mock(InputFile.class);\n"
    } else {
        ""
    };
    format!(
        r#"package com.lioncorp.sonar.mulesoft.checks;

import org.junit.jupiter.api.Test;
import org.w3c.dom.Document;

import static org.assertj.core.api.Assertions.assertThat;
import static org.mockito.Mockito.mock;

class {class_name} {{

    @Test
    void testEmptyDocument() {{
{input_file}        Document document = mock(Document.class);
        assertThat(document).isNotNull();
    }}
}}
"#
    )
}
