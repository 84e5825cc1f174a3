use crate::domain::repository::CharacterRepository;
use crate::domain::types::{Character, NewCharacter, User, default_character_name};
use crate::domain::validation::validate_character;
use crate::error::AccountsServiceError;

// ── CreateCharacter ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CreateCharacterInput {
    pub name: Option<String>,
    pub faction: Option<String>,
    pub race: Option<String>,
    pub character_class: Option<String>,
}

pub struct CreateCharacterUseCase<C: CharacterRepository> {
    pub characters: C,
}

impl<C: CharacterRepository> CreateCharacterUseCase<C> {
    /// Refuses, rather than replaces, when `user` already has an active character.
    pub async fn execute(
        &self,
        user: &User,
        input: CreateCharacterInput,
    ) -> Result<Character, AccountsServiceError> {
        if let Some(existing) = self.characters.find_active(user.id).await? {
            return Err(AccountsServiceError::CharacterAlreadyExists(
                existing.summary(),
            ));
        }

        let choice = validate_character(
            input.name.as_deref(),
            input.faction.as_deref(),
            input.race.as_deref(),
            input.character_class.as_deref(),
        )?;

        let character = self
            .characters
            .create(&NewCharacter {
                user_id: user.id,
                name: choice
                    .name
                    .unwrap_or_else(|| default_character_name(&user.username)),
                faction: choice.faction,
                race: choice.race,
                character_class: choice.character_class,
            })
            .await?;
        tracing::info!(
            user_id = user.id,
            character_id = character.id,
            race = %character.race,
            class = %character.character_class,
            "character created"
        );
        Ok(character)
    }
}

// ── GetCharacter ─────────────────────────────────────────────────────────────

pub struct GetCharacterUseCase<C: CharacterRepository> {
    pub characters: C,
}

impl<C: CharacterRepository> GetCharacterUseCase<C> {
    pub async fn execute(&self, user: &User) -> Result<Character, AccountsServiceError> {
        self.characters
            .find_active(user.id)
            .await?
            .ok_or(AccountsServiceError::CharacterNotFound)
    }
}
