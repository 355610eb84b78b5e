//! The cached query services behind the tools.

use std::sync::Arc;

use medkit_client::domains::{
    AnatomyQuery, DictionaryQuery, DiseaseQuery, DrugFoodQuery, DrugInteractionQuery, ExamQuery, MedicalTestQuery,
};
use medkit_client::{DomainService, LanguageModel, Prompted, open_service};
use medkit_core::registry;
use medkit_core::{AppConfig, CacheConfig, Error, StorageHandle};

use crate::error::ToolError;

/// Language model shared by every service.
pub type Model = Arc<dyn LanguageModel>;

/// One cached service per module.
pub struct Services {
    pub disease: DomainService<DiseaseQuery, Model>,
    pub drug_interaction: DomainService<DrugInteractionQuery, Model>,
    pub drug_food: DomainService<DrugFoodQuery, Model>,
    pub dictionary: DomainService<DictionaryQuery, Model>,
    pub anatomy: DomainService<AnatomyQuery, Model>,
    pub exam_questions: DomainService<ExamQuery, Model>,
    pub test_info: DomainService<MedicalTestQuery, Model>,
}

/// A module's cache as seen by the store tools.
///
/// Modules may share a store file, so every store access goes through
/// `domain`.
pub struct ModuleCache<'a> {
    pub domain: &'a str,
    pub config: &'a CacheConfig,
    pub storage: Option<&'a StorageHandle>,
    /// Model the module generates with, after overrides.
    pub model: &'a str,
}

impl<'a> ModuleCache<'a> {
    fn of<Q: Prompted + 'static>(service: &'a DomainService<Q, Model>) -> Self {
        Self {
            domain: service.domain(),
            config: service.config(),
            storage: service.storage(),
            model: service.generator().model_name(),
        }
    }

    /// The open store, failing when caching is off or the store is unavailable.
    pub fn require_storage(&self) -> Result<&'a StorageHandle, ToolError> {
        self.storage
            .ok_or_else(|| Error::StorageUnavailable(format!("no cache store for module '{}'", self.domain)).into())
    }
}

impl Services {
    /// Open every module's store. A store that cannot be opened leaves its
    /// module running uncached.
    pub async fn open(config: &AppConfig, model: Model) -> Self {
        Self {
            disease: open_service(config, model.clone()).await,
            drug_interaction: open_service(config, model.clone()).await,
            drug_food: open_service(config, model.clone()).await,
            dictionary: open_service(config, model.clone()).await,
            anatomy: open_service(config, model.clone()).await,
            exam_questions: open_service(config, model.clone()).await,
            test_info: open_service(config, model).await,
        }
    }

    /// Cache view of `module`.
    pub fn module(&self, module: &str) -> Result<ModuleCache<'_>, ToolError> {
        match module {
            registry::DISEASE_INFO => Ok(ModuleCache::of(&self.disease)),
            registry::DRUG_DRUG_INTERACTION => Ok(ModuleCache::of(&self.drug_interaction)),
            registry::DRUG_FOOD_INTERACTION => Ok(ModuleCache::of(&self.drug_food)),
            registry::MEDICAL_DICTIONARY => Ok(ModuleCache::of(&self.dictionary)),
            registry::MEDICAL_ANATOMY => Ok(ModuleCache::of(&self.anatomy)),
            registry::MEDICAL_PHYSICAL_EXAMS_QUESTIONS => Ok(ModuleCache::of(&self.exam_questions)),
            registry::MEDICAL_TEST_INFO => Ok(ModuleCache::of(&self.test_info)),
            other => Err(ToolError::UnknownModule(other.to_string())),
        }
    }

    /// Close every store.
    pub async fn close(self) {
        let results = [
            (registry::DISEASE_INFO, self.disease.close().await),
            (registry::DRUG_DRUG_INTERACTION, self.drug_interaction.close().await),
            (registry::DRUG_FOOD_INTERACTION, self.drug_food.close().await),
            (registry::MEDICAL_DICTIONARY, self.dictionary.close().await),
            (registry::MEDICAL_ANATOMY, self.anatomy.close().await),
            (registry::MEDICAL_PHYSICAL_EXAMS_QUESTIONS, self.exam_questions.close().await),
            (registry::MEDICAL_TEST_INFO, self.test_info.close().await),
        ];
        for (module, result) in results {
            if let Err(e) = result {
                tracing::warn!(module, error = %e, "failed to close cache store");
            }
        }
    }
}
