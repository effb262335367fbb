use tp_core::VideoRecord;

/// Longest prompt sent to the model, in characters.
pub const MAX_PROMPT_CHARS: usize = 15_000;
/// How much of the video description goes into the prompt.
pub const DESCRIPTION_EXCERPT_CHARS: usize = 500;
/// How many tags go into the prompt.
pub const PROMPT_TAG_LIMIT: usize = 10;

/// Builds the blog-writing prompt for a video, already truncated to `MAX_PROMPT_CHARS`.
pub fn build_prompt(record: &VideoRecord) -> String {
    let tags = record
        .tags
        .iter()
        .take(PROMPT_TAG_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let description: String = record
        .description
        .chars()
        .take(DESCRIPTION_EXCERPT_CHARS)
        .collect();
    let link = record.video_url();

    let prompt = format!(
        "유튜브 영상 정보를 기반으로 티스토리 블로그 포스팅용 콘텐츠를 작성해주세요.

# 영상 정보
- 제목: {title}
- 채널: {channel}
- 태그: {tags}
- 설명: {description}...

# 요구사항
1. 한국어로 작성해주세요.
2. 블로그 제목은 SEO에 최적화되게 영상 제목을 수정해주세요.
3. 서론, 본론, 결론 구조로 작성해주세요.
4. 본론은 주요 내용을 3-5개의 소제목으로 나누어 작성해주세요.
5. 마크다운 형식으로 작성해주세요.
6. 소제목은 ## 헤더로 작성해주세요.
7. 글자 수는 2000자 이상으로 작성해주세요.
8. 적절한 곳에 이미지 삽입 및 표를 활용하면 좋습니다.
9. 전문적이고 교육적인 내용으로 작성해주세요.
10. 블로그 글의 첫 부분에 원본 영상 링크를 포함해주세요: {link}

# 최종 출력 형식
```
# [블로그 제목]

원본 영상: {link}

[서론]

## [소제목 1]
[내용]

## [소제목 2]
[내용]

## [소제목 3]
[내용]

[결론]
```
",
        title = record.title,
        channel = record.channel_title,
        tags = tags,
        description = description,
        link = link,
    );

    truncate_prompt(prompt, MAX_PROMPT_CHARS)
}

/// Keeps the first `max_chars` characters, dropping the tail.
pub fn truncate_prompt(prompt: String, max_chars: usize) -> String {
    match prompt.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut prompt = prompt;
            prompt.truncate(byte_index);
            prompt
        }
        None => prompt,
    }
}
