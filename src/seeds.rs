//! Built-in seed challenges. These guarantee the catalog is useful even
//! without an external challenge bank.

use crate::domain::{Challenge, ChallengeSource, Difficulty, TestCase};

pub fn seed_challenges() -> Vec<Challenge> {
  vec![
    Challenge {
      id: "reverse-a-string".into(),
      title: "Reverse a String".into(),
      description: "Write a program that reads one line and prints it reversed."
        .into(),
      difficulty: Difficulty::Easy,
      category: "Strings".into(),
      source: ChallengeSource::Seed,
      initial_code: r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        while (in.hasNextLine()) {
            String s = in.nextLine();
            // Your code here
        }
    }
}"#
      .into(),
      solution_code: Some(
        r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        while (in.hasNextLine()) {
            String s = in.nextLine();
            System.out.println(new StringBuilder(s).reverse());
        }
    }
}"#
        .into(),
      ),
      test_cases: vec![
        TestCase { input: "hello".into(), expected: "olleh".into() },
        TestCase { input: "Hannah".into(), expected: "hannaH".into() },
      ],
      hint: "Try using two pointers, one at the start and one at the end.".into(),
      video_url: "https://example.com/reverse-string-tutorial".into(),
    },
    Challenge {
      id: "sum-of-two-numbers".into(),
      title: "Sum of Two Numbers".into(),
      description: "Each input line holds two integers separated by a space. Print their sum."
        .into(),
      difficulty: Difficulty::Easy,
      category: "Math".into(),
      source: ChallengeSource::Seed,
      initial_code: r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        while (in.hasNextLine()) {
            String[] parts = in.nextLine().trim().split("\\s+");
            // Your code here
        }
    }
}"#
      .into(),
      solution_code: Some(
        r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        while (in.hasNextLine()) {
            String[] parts = in.nextLine().trim().split("\\s+");
            System.out.println(Long.parseLong(parts[0]) + Long.parseLong(parts[1]));
        }
    }
}"#
        .into(),
      ),
      test_cases: vec![
        TestCase { input: "2 7".into(), expected: "9".into() },
        TestCase { input: "-1 1".into(), expected: "0".into() },
        TestCase { input: "40 2".into(), expected: "42".into() },
      ],
      hint: "Split each line on whitespace and parse both halves.".into(),
      video_url: "https://example.com/sum-two-numbers-tutorial".into(),
    },
    Challenge {
      id: "longest-word".into(),
      title: "Longest Word".into(),
      description:
        "Each input line is a sentence. Print the longest word of each line; on a tie, print the first."
          .into(),
      difficulty: Difficulty::Medium,
      category: "Strings".into(),
      source: ChallengeSource::Seed,
      initial_code: r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        while (in.hasNextLine()) {
            String line = in.nextLine();
            // Your code here
        }
    }
}"#
      .into(),
      solution_code: Some(
        r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        while (in.hasNextLine()) {
            String best = "";
            for (String w : in.nextLine().split("\\s+")) {
                if (w.length() > best.length()) best = w;
            }
            System.out.println(best);
        }
    }
}"#
        .into(),
      ),
      test_cases: vec![
        TestCase { input: "the quick brown fox".into(), expected: "quick".into() },
        TestCase { input: "a bb ccc".into(), expected: "ccc".into() },
      ],
      hint: "Track the best candidate while scanning the words in order.".into(),
      video_url: "https://example.com/longest-word-tutorial".into(),
    },
    Challenge {
      id: "array-maximum".into(),
      title: "Array Maximum".into(),
      description:
        "Each input line holds space-separated integers. Print the largest value of each line."
          .into(),
      difficulty: Difficulty::Hard,
      category: "Arrays".into(),
      source: ChallengeSource::Seed,
      initial_code: r#"import java.util.Scanner;

public class Main {
    public static void main(String[] args) {
        Scanner in = new Scanner(System.in);
        while (in.hasNextLine()) {
            String[] parts = in.nextLine().trim().split("\\s+");
            // Your code here
        }
    }
}"#
      .into(),
      solution_code: None,
      test_cases: vec![
        TestCase { input: "3 1 4 1 5".into(), expected: "5".into() },
        TestCase { input: "-7 -3 -9".into(), expected: "-3".into() },
      ],
      hint: "Mind the all-negative case when picking a starting maximum.".into(),
      video_url: "https://example.com/array-maximum-tutorial".into(),
    },
  ]
}
